//! # CodeNN Vis Cluster
//!
//! Embeds submitted samples with a fixed-shape model and keeps every vector
//! in an append-only store that can be projected to 2-D on demand.
//!
//! ## Features
//!
//! - **Pluggable model** behind the [`EmbeddingModel`] trait
//! - **Soft cluster assignment** built in ([`SoftClusterModel`])
//! - **Append-only store**: duplicates are kept, nothing is cached
//! - **PCA** (deterministic) and **t-SNE** (seeded) projections
//!
//! ## Architecture
//!
//! ```text
//! SourceSample
//!     │
//!     ├──> ModelInput (pre-order tokens + depths, padded/truncated)
//!     │
//!     ├──> EmbeddingModel
//!     │      └─> Vec<f32>[dimension]
//!     │
//!     └──> ClusterStore (append)
//!            └─> get_projection(pca | tsne) ──> Projection { points }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codenn_ast::SourceSample;
//! use codenn_cluster::{Algorithm, ClusterStore, EmbeddingPipeline, ModelConfig,
//!     ProjectionConfig, SoftClusterModel};
//!
//! let config = ModelConfig::default();
//! let pipeline = EmbeddingPipeline::new(Box::new(SoftClusterModel::seeded(&config)));
//! let mut store = ClusterStore::new();
//!
//! for (path, source) in [("a.lua", "req"), ("b.lua", "func")] {
//!     let sidecar = format!(
//!         r#"{{"path":"{path}","nodes":[{{"category":"function","order_index":0,"position":1,"characters_count":3}}]}}"#
//!     );
//!     let sample = SourceSample::from_strings(&sidecar, source).unwrap();
//!     pipeline.submit(&sample, &mut store).unwrap();
//! }
//!
//! let projection = store
//!     .get_projection(Algorithm::Pca, &ProjectionConfig::default())
//!     .unwrap();
//! assert_eq!(projection.len(), 2);
//! ```

mod config;
mod encoding;
mod error;
mod model;
mod pipeline;
mod projection;
mod rng;
mod store;
mod types;

pub use config::{ModelConfig, ProjectionConfig};
pub use encoding::{category_token, ModelInput, PAD_TOKEN};
pub use error::{ClusterError, Result};
pub use model::{EmbeddingModel, SoftClusterModel, FEATURE_DIM};
pub use pipeline::EmbeddingPipeline;
pub use projection::{Pca, Projector, Tsne};
pub use store::{ClusterStore, MIN_PROJECTION_RECORDS};
pub use types::{Algorithm, EmbeddingRecord, ProjectedPoint, Projection};
