use crate::config::SceneConfig;
use crate::palette::Rgb;
use crate::scene::{Axis, Layout, Line, Marker, Scene, Trace};
use codenn_ast::CategoryTraces;

pub const SCATTER_TITLE: &str = "Input nodes order";

/// Scatterplot of node order: x = order index, one row per category.
///
/// `show_legend` and `show_text` only change presentation metadata; point
/// coordinates are the same either way.
pub fn render_scatter(traces: &CategoryTraces, config: &SceneConfig) -> Scene {
    let rows = config.rows();

    let scene_traces = rows
        .iter()
        .map(|&category| {
            let source = traces.get(category);
            let mut trace = Trace::markers(category.as_str());
            for (&x, &y) in source.x.iter().zip(&source.y) {
                trace.push(x, y);
            }
            trace.opacity = Some(config.opacity);
            if config.show_text {
                trace.hovertext = Some(source.text.clone());
                trace.hoverinfo = Some("x+y+text".to_string());
            } else {
                trace.hoverinfo = Some("x+y".to_string());
            }
            trace.marker = Some(Marker {
                size: Some(config.marker_size),
                line: Some(Line {
                    width: 0.5,
                    color: Rgb::WHITE,
                }),
                ..Marker::colored(config.palette.color(category))
            });
            trace
        })
        .collect();

    Scene {
        title: SCATTER_TITLE.to_string(),
        layout: Layout {
            xaxis: Axis {
                rangemode: Some("tozero".to_string()),
                ..Axis::titled("Order in source code")
            },
            yaxis: Axis {
                categoryarray: Some(rows.iter().map(|c| c.as_str().to_string()).collect()),
                ..Axis::titled("Container")
            },
            showlegend: config.show_legend,
            ..Layout::default()
        },
        traces: scene_traces,
    }
}
