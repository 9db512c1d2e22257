//! # CodeNN Vis AST
//!
//! Source samples and their pre-computed AST sidecars, flattened into
//! per-category point sets that every view of the dashboard shares.
//!
//! ## Architecture
//!
//! ```text
//! Sidecar JSON (path | url, nodes[])
//!     │
//!     ├──> SampleLocator (exactly one of path/url)
//!     │
//!     ├──> Source bytes ──> UTF-8, or ISO-8859-1 fallback ──> SourceText
//!     │
//!     ├──> RawNode ──> AstNode (closed Category, unknown labels rejected)
//!     │
//!     └──> Flattener (pre-order, explicit stack)
//!          └─> CategoryTraces { category → (x, y, text, spans) }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codenn_ast::{Category, SourceSample};
//!
//! let sample = SourceSample::from_strings(
//!     r#"{"path":"x","nodes":[{"category":"function","order_index":0,"position":1,"characters_count":4}]}"#,
//!     "func end",
//! )
//! .unwrap();
//!
//! let traces = sample.flatten().unwrap();
//! assert_eq!(traces.get(Category::Function).text, vec!["func"]);
//! ```

mod category;
mod config;
mod document;
mod error;
mod flatten;
mod node;
mod sample;
mod source;

pub use category::{Category, UnknownCategory};
pub use config::SampleConfig;
pub use document::{AstDocument, SampleLocator};
pub use error::{AstError, Result};
pub use flatten::{CategoryTrace, CategoryTraces, Flattener, NodeSpan, PointRef};
pub use node::{AstNode, NodeVisit, Preorder};
pub use sample::{DefaultFetcher, SourceFetcher, SourceSample};
pub use source::{decode_source, display_text, SourceText, LINE_BREAK_MARKER};
