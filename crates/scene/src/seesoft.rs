use crate::config::SceneConfig;
use crate::error::Result;
use crate::scene::{Axis, Layout, Marker, Orientation, Scene, Trace};
use crate::units::{text_units, TextUnit};
use codenn_ast::{Category, SourceSample};
use std::collections::BTreeMap;

pub const SEESOFT_TITLE: &str = "Seesoft";
const UNCOVERED_TRACE: &str = "uncovered";

/// Density map of the source: one horizontal bar per text unit at
/// (column span, line), colored by category.
///
/// Each bar carries its unit key as `text` and the scroll offset of its line
/// (`line * line_height_px`) as `customdata`; the key matches the element ids
/// of the source view.
pub fn render_seesoft(sample: &SourceSample, config: &SceneConfig) -> Result<Scene> {
    let units = text_units(sample.text(), sample.nodes(), config.paint_comments)?;
    Ok(seesoft_scene(&units, config))
}

fn seesoft_scene(units: &[TextUnit], config: &SceneConfig) -> Scene {
    let mut by_category: BTreeMap<Option<Category>, Trace> = BTreeMap::new();

    for unit in units {
        let trace = by_category.entry(unit.category).or_insert_with(|| {
            let name = unit.category.map_or(UNCOVERED_TRACE, Category::as_str);
            let mut trace = Trace::bar(name);
            trace.orientation = Some(Orientation::Horizontal);
            trace.base = Some(Vec::new());
            trace.text = Some(Vec::new());
            trace.customdata = Some(Vec::new());
            trace.hoverinfo = Some("text".to_string());
            trace.marker = Some(Marker::colored(config.palette.fill(unit.category)));
            trace.showlegend = Some(false);
            trace
        });

        trace.push(unit.width(), unit.line);
        if let Some(base) = trace.base.as_mut() {
            base.push(unit.column as f64);
        }
        if let Some(text) = trace.text.as_mut() {
            text.push(unit.key.clone());
        }
        if let Some(customdata) = trace.customdata.as_mut() {
            customdata.push(unit.line as f64 * config.line_height_px);
        }
    }

    Scene {
        title: SEESOFT_TITLE.to_string(),
        layout: Layout {
            xaxis: Axis::hidden(),
            yaxis: Axis::hidden().reversed(),
            ..Layout::default()
        },
        traces: by_category.into_values().collect(),
    }
}
