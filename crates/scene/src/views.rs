use crate::config::SceneConfig;
use crate::error::Result;
use crate::scatter::render_scatter;
use crate::scene::Scene;
use crate::seesoft::render_seesoft;
use crate::source_view::SourceView;
use crate::tree::render_tree;
use codenn_ast::SourceSample;
use serde::Serialize;

/// Every per-sample view, derived from one decoded sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleViews {
    pub sample: String,
    pub scatter: Scene,
    pub tree: Scene,
    pub seesoft: Scene,
    pub source: SourceView,
}

impl SampleViews {
    pub fn render(sample: &SourceSample, config: &SceneConfig) -> Result<Self> {
        let traces = sample.flatten()?;
        let views = Self {
            sample: sample.identity(),
            scatter: render_scatter(&traces, config),
            tree: render_tree(sample.nodes(), config)?,
            seesoft: render_seesoft(sample, config)?,
            source: SourceView::build(sample, config)?,
        };
        log::debug!(
            "Rendered views for {} ({} nodes, {} source lines)",
            views.sample,
            traces.len(),
            views.source.lines.len()
        );
        Ok(views)
    }
}
