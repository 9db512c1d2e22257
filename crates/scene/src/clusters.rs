use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::palette::Rgb;
use crate::scene::{Axis, Coord, Layout, Line, Marker, MarkerColor, Scene, Trace};
use codenn_cluster::{EmbeddingRecord, Projection};
use std::collections::BTreeMap;

pub const CLUSTER_TITLE: &str = "Cluster diagram";
pub const PREDICTION_TITLE: &str = "Prediction";
pub const CURRENT_SAMPLE_TRACE: &str = "current sample";

/// Projected store: one trace per dominant cluster, plus a highlight of the
/// most recent record.
pub fn render_clusters(
    projection: &Projection,
    records: &[EmbeddingRecord],
    config: &SceneConfig,
) -> Result<Scene> {
    if projection.len() != records.len() {
        return Err(SceneError::Layout(format!(
            "projection has {} points for {} records",
            projection.len(),
            records.len()
        )));
    }

    let mut groups: BTreeMap<usize, Trace> = BTreeMap::new();
    for point in &projection.points {
        let record = records.get(point.record_index).ok_or_else(|| {
            SceneError::Layout(format!("no record at index {}", point.record_index))
        })?;
        let cluster = record.dominant_cluster().unwrap_or(0);
        let trace = groups.entry(cluster).or_insert_with(|| {
            let mut trace = Trace::markers(format!("cluster {cluster}"));
            trace.hovertext = Some(Vec::new());
            trace.hoverinfo = Some("text".to_string());
            trace.opacity = Some(config.opacity);
            trace.marker = Some(Marker {
                size: Some(config.marker_size),
                ..Marker::default()
            });
            trace
        });
        trace.push(point.x, point.y);
        if let Some(hover) = trace.hovertext.as_mut() {
            hover.push(point.sample.clone());
        }
    }

    let mut traces: Vec<Trace> = groups.into_values().collect();

    if let Some(current) = projection.points.last() {
        let mut highlight = Trace::markers(CURRENT_SAMPLE_TRACE);
        highlight.push(current.x, current.y);
        highlight.hovertext = Some(vec![current.sample.clone()]);
        highlight.hoverinfo = Some("text".to_string());
        highlight.marker = Some(Marker {
            size: Some(config.marker_size * 2.0),
            symbol: Some("circle-open".to_string()),
            line: Some(Line {
                width: 2.0,
                color: Rgb::BLACK,
            }),
            ..Marker::colored(Rgb::BLACK)
        });
        traces.push(highlight);
    }

    Ok(Scene {
        title: format!("{CLUSTER_TITLE} ({})", projection.algorithm.label()),
        layout: Layout {
            xaxis: Axis::titled("Component 1"),
            yaxis: Axis::titled("Component 2"),
            showlegend: config.show_legend,
            ..Layout::default()
        },
        traces,
    })
}

/// Bar chart of one record's soft cluster membership; the dominant cluster
/// is drawn in the function color, the rest in the comment color
pub fn render_prediction(record: &EmbeddingRecord, config: &SceneConfig) -> Scene {
    let dominant = record.dominant_cluster();
    let mut trace = Trace::bar("membership");
    let mut colors = Vec::with_capacity(record.vector.len());
    for (cluster, &value) in record.vector.iter().enumerate() {
        trace.push(Coord::Label(cluster.to_string()), f64::from(value));
        colors.push(if Some(cluster) == dominant {
            config.palette.function
        } else {
            config.palette.comment
        });
    }
    trace.hovertext = Some(vec![record.sample.clone(); record.vector.len()]);
    trace.marker = Some(Marker {
        color: Some(MarkerColor::PerPoint(colors)),
        ..Marker::default()
    });

    Scene {
        title: PREDICTION_TITLE.to_string(),
        layout: Layout {
            xaxis: Axis::titled("Cluster"),
            yaxis: Axis {
                rangemode: Some("tozero".to_string()),
                ..Axis::titled("Membership")
            },
            ..Layout::default()
        },
        traces: vec![trace],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenn_cluster::{Algorithm, ProjectedPoint};
    use pretty_assertions::assert_eq;

    fn record(sample: &str, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            sample: sample.to_string(),
            sample_index: 0,
            vector,
        }
    }

    fn fixture() -> (Projection, Vec<EmbeddingRecord>) {
        let records = vec![
            record("a.lua", vec![0.9, 0.1]),
            record("b.lua", vec![0.2, 0.8]),
            record("c.lua", vec![0.6, 0.4]),
        ];
        let points = records
            .iter()
            .enumerate()
            .map(|(i, r)| ProjectedPoint {
                x: i as f64,
                y: -(i as f64),
                record_index: i,
                sample: r.sample.clone(),
            })
            .collect();
        (
            Projection {
                algorithm: Algorithm::Tsne,
                points,
            },
            records,
        )
    }

    #[test]
    fn groups_by_dominant_cluster_and_highlights_latest() {
        let (projection, records) = fixture();
        let scene = render_clusters(&projection, &records, &SceneConfig::default()).unwrap();

        assert_eq!(scene.title, "Cluster diagram (T-SNE)");
        let names: Vec<_> = scene.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["cluster 0", "cluster 1", "current sample"]);
        assert_eq!(
            scene.trace("cluster 0").unwrap().hovertext,
            Some(vec!["a.lua".to_string(), "c.lua".to_string()])
        );
        let current = scene.trace(CURRENT_SAMPLE_TRACE).unwrap();
        assert_eq!(current.x, vec![Coord::Number(2.0)]);
        assert_eq!(current.y, vec![Coord::Number(-2.0)]);
    }

    #[test]
    fn mismatched_inputs_are_rejected() {
        let (projection, mut records) = fixture();
        records.pop();
        assert!(matches!(
            render_clusters(&projection, &records, &SceneConfig::default()),
            Err(SceneError::Layout(_))
        ));
    }

    #[test]
    fn prediction_has_one_bar_per_component() {
        let scene = render_prediction(&record("b.lua", vec![0.25, 0.75]), &SceneConfig::default());
        let bars = &scene.traces[0];
        assert_eq!(bars.x, vec![Coord::Label("0".into()), Coord::Label("1".into())]);
        assert_eq!(bars.y, vec![Coord::Number(0.25), Coord::Number(0.75)]);
        let palette = SceneConfig::default().palette;
        assert_eq!(
            bars.marker.as_ref().unwrap().color,
            Some(MarkerColor::PerPoint(vec![palette.comment, palette.function]))
        );
    }
}
