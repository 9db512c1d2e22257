use crate::types::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration of the built-in soft-cluster-assignment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Output dimension: number of soft clusters
    pub dimension: usize,

    /// Fixed length of the node sequence fed to the model
    pub sequence_length: usize,

    /// Degrees of freedom of the Student's t kernel
    pub alpha: f64,

    /// Seed for generated centroids when no weights file is given
    pub seed: u64,

    /// JSON file with trained centroids
    pub weights: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dimension: 10,
            sequence_length: 512,
            alpha: 1.0,
            seed: 0x00C0_DE00,
            weights: None,
        }
    }
}

impl ModelConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension < 2 {
            return Err(format!("dimension ({}) must be >= 2", self.dimension));
        }
        if self.sequence_length == 0 {
            return Err("sequence_length must be > 0".to_string());
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(format!("alpha ({}) must be a positive number", self.alpha));
        }
        Ok(())
    }
}

/// Configuration of the projectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Algorithm used when a request does not name one
    pub default_algorithm: Algorithm,

    /// Target perplexity; clamped below the record count at projection time
    pub tsne_perplexity: f64,

    /// Gradient descent iterations
    pub tsne_iterations: usize,

    /// Step size; `None` picks `max(n / early_exaggeration / 4, 50)`
    pub tsne_learning_rate: Option<f64>,

    /// Affinity multiplier during the first iterations
    pub tsne_early_exaggeration: f64,

    /// Seed for the initial layout
    pub tsne_seed: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            default_algorithm: Algorithm::Pca,
            tsne_perplexity: 30.0,
            tsne_iterations: 1000,
            tsne_learning_rate: None,
            tsne_early_exaggeration: 12.0,
            tsne_seed: 42,
        }
    }
}

impl ProjectionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tsne_perplexity.is_finite() && self.tsne_perplexity > 0.0) {
            return Err(format!(
                "tsne_perplexity ({}) must be a positive number",
                self.tsne_perplexity
            ));
        }
        if self.tsne_iterations == 0 {
            return Err("tsne_iterations must be > 0".to_string());
        }
        if let Some(rate) = self.tsne_learning_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(format!("tsne_learning_rate ({rate}) must be positive"));
            }
        }
        if self.tsne_early_exaggeration < 1.0 {
            return Err(format!(
                "tsne_early_exaggeration ({}) must be >= 1",
                self.tsne_early_exaggeration
            ));
        }
        Ok(())
    }
}
