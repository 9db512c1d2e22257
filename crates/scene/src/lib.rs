//! # CodeNN Vis Scenes
//!
//! Turns a decoded sample and the cluster store into serialisable scenes
//! (title, layout, traces) for a plotting front end.
//!
//! ## Architecture
//!
//! ```text
//! SourceSample ──> CategoryTraces ──> scatter (x = order index, row = category)
//!     │
//!     ├──> TreeLayout (petgraph) ──> tree (markers + parent→child edges)
//!     │
//!     └──> text units L{line}S{segment}
//!            ├─> seesoft (bar per unit, customdata = scroll offset)
//!            └─> source view (span per unit, id = view id + key)
//!
//! Projection + records ──> cluster diagram, prediction bars
//! ```
//!
//! Colors come from one [`CategoryPalette`]; every category lookup is an
//! exhaustive match.

mod clusters;
mod config;
mod error;
mod palette;
mod scatter;
mod scene;
mod seesoft;
mod source_view;
mod tree;
mod units;
mod views;

pub use clusters::{
    render_clusters, render_prediction, CLUSTER_TITLE, CURRENT_SAMPLE_TRACE, PREDICTION_TITLE,
};
pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use palette::{CategoryPalette, Rgb};
pub use scatter::{render_scatter, SCATTER_TITLE};
pub use scene::{
    Axis, Coord, Layout, Line, Margin, Marker, MarkerColor, Orientation, Scene, Trace, TraceKind,
    TraceMode,
};
pub use seesoft::{render_seesoft, SEESOFT_TITLE};
pub use source_view::{SourceLine, SourceUnit, SourceView};
pub use tree::{render_tree, TreeLayout, TreeNode, TREE_TITLE};
pub use units::{paint, text_units, unit_key, TextUnit};
pub use views::SampleViews;
