use crate::config::ModelConfig;
use crate::encoding::ModelInput;
use crate::error::{ClusterError, Result};
use crate::rng::SplitMix64;
use codenn_ast::Category;
use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;
use std::path::Path;

/// The embedding model seam: a fixed-shape input in, a fixed-length vector
/// out. Implementations are opaque to the rest of the crate.
pub trait EmbeddingModel: Send + Sync {
    /// Model identifier used in logs
    fn id(&self) -> &str;

    /// Length of every output vector
    fn dimension(&self) -> usize;

    /// Sequence length the input must be encoded to
    fn sequence_length(&self) -> usize;

    fn embed(&self, input: &ModelInput) -> Result<Vec<f32>>;
}

/// Length of the summary vector the soft-assignment layer works on
pub const FEATURE_DIM: usize = 14;

#[derive(Debug, Deserialize)]
struct WeightsFile {
    centroids: Vec<Vec<f64>>,
    #[serde(default)]
    alpha: Option<f64>,
}

/// Built-in model: summarises the node sequence into [`FEATURE_DIM`]
/// features, then soft-assigns it to `dimension` centroids with a Student's t
/// kernel, `q_j ∝ (1 + ‖z − μ_j‖² / α)^(−(α+1)/2)`.
///
/// Centroids come from a weights file when configured, otherwise they are
/// generated from the configured seed.
#[derive(Debug, Clone)]
pub struct SoftClusterModel {
    id: String,
    centroids: Array2<f64>,
    alpha: f64,
    sequence_length: usize,
}

impl SoftClusterModel {
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        config.validate().map_err(ClusterError::InvalidConfig)?;
        match &config.weights {
            Some(path) => Self::load_weights(path, config),
            None => Ok(Self::seeded(config)),
        }
    }

    /// Model with centroids drawn from the configured seed
    #[must_use]
    pub fn seeded(config: &ModelConfig) -> Self {
        let mut rng = SplitMix64::new(config.seed);
        let centroids =
            Array2::from_shape_fn((config.dimension, FEATURE_DIM), |_| rng.next_f64());
        Self {
            id: format!("soft-cluster-seed-{:x}", config.seed),
            centroids,
            alpha: config.alpha,
            sequence_length: config.sequence_length,
        }
    }

    pub fn load_weights(path: &Path, config: &ModelConfig) -> Result<Self> {
        log::info!("Loading model weights from {}", path.display());
        let file: WeightsFile = serde_json::from_slice(&std::fs::read(path)?)?;
        let rows = file.centroids.len();
        if rows != config.dimension {
            return Err(ClusterError::InvalidConfig(format!(
                "weights file has {rows} centroids, model dimension is {}",
                config.dimension
            )));
        }
        if let Some(row) = file.centroids.iter().find(|row| row.len() != FEATURE_DIM) {
            return Err(ClusterError::InvalidConfig(format!(
                "centroid has {} features, expected {FEATURE_DIM}",
                row.len()
            )));
        }
        let flat: Vec<f64> = file.centroids.into_iter().flatten().collect();
        let centroids = Array2::from_shape_vec((rows, FEATURE_DIM), flat)
            .map_err(|e| ClusterError::InvalidConfig(e.to_string()))?;
        let alpha = file.alpha.unwrap_or(config.alpha);
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ClusterError::InvalidConfig(format!(
                "alpha ({alpha}) must be a positive number"
            )));
        }

        Ok(Self {
            id: path.display().to_string(),
            centroids,
            alpha,
            sequence_length: config.sequence_length,
        })
    }

    /// Summary features of an encoded sample
    #[must_use]
    pub fn features(input: &ModelInput) -> Array1<f64> {
        let mut features = Array1::<f64>::zeros(FEATURE_DIM);
        let len = input.len();
        if len == 0 {
            return features;
        }

        let span = (len.max(2) - 1) as f64;
        let mut counts = [0usize; Category::ALL.len()];
        let mut position_sums = [0f64; Category::ALL.len()];
        for (i, category) in input.categories().enumerate() {
            counts[category.index()] += 1;
            position_sums[category.index()] += i as f64 / span;
        }
        for (k, &count) in counts.iter().enumerate() {
            features[k] = count as f64 / len as f64;
            if count > 0 {
                features[Category::ALL.len() + k] = position_sums[k] / count as f64;
            }
        }

        let depths = &input.depths()[..len];
        let max_depth = depths.iter().copied().max().unwrap_or(0);
        let mean_depth = depths.iter().map(|&d| f64::from(d)).sum::<f64>() / len as f64;
        features[12] = mean_depth / (1.0 + f64::from(max_depth));
        features[13] = len as f64 / input.sequence_length() as f64;
        features
    }

    fn kernel(&self, z: &Array1<f64>, centroid: ArrayView1<'_, f64>) -> f64 {
        let dist_sq = (z - &centroid).mapv(|v| v * v).sum();
        (1.0 + dist_sq / self.alpha).powf(-(self.alpha + 1.0) / 2.0)
    }
}

impl EmbeddingModel for SoftClusterModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn dimension(&self) -> usize {
        self.centroids.nrows()
    }

    fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    fn embed(&self, input: &ModelInput) -> Result<Vec<f32>> {
        if input.sequence_length() != self.sequence_length {
            return Err(ClusterError::model_input(format!(
                "input sequence length {} does not match model sequence length {}",
                input.sequence_length(),
                self.sequence_length
            )));
        }
        if input.is_empty() {
            return Err(ClusterError::model_input("input has no nodes"));
        }

        let z = Self::features(input);
        let weights: Vec<f64> = self
            .centroids
            .rows()
            .into_iter()
            .map(|centroid| self.kernel(&z, centroid))
            .collect();
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(ClusterError::Projection(
                "soft assignment produced no mass".to_string(),
            ));
        }
        Ok(weights.iter().map(|w| (w / total) as f32).collect())
    }
}
