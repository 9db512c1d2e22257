use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model output for one submitted sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Identity of the owning sample (path or URL)
    pub sample: String,
    /// Position of this record in submission order
    pub sample_index: usize,
    pub vector: Vec<f32>,
}

impl EmbeddingRecord {
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Index of the largest component (the dominant soft cluster)
    #[must_use]
    pub fn dominant_cluster(&self) -> Option<usize> {
        self.vector
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}

/// Dimensionality reduction used for the cluster view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Pca,
    Tsne,
}

impl Algorithm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pca => "pca",
            Self::Tsne => "tsne",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pca => "PCA",
            Self::Tsne => "T-SNE",
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Pca
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pca" => Ok(Self::Pca),
            "tsne" | "t-sne" => Ok(Self::Tsne),
            other => Err(format!(
                "unsupported algorithm '{other}' (expected 'pca' or 'tsne')"
            )),
        }
    }
}

/// A record placed in 2-D
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub record_index: usize,
    pub sample: String,
}

/// 2-D layout of every record in the store, in store order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub algorithm: Algorithm,
    pub points: Vec<ProjectedPoint>,
}

impl Projection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Euclidean distance between two projected points
    #[must_use]
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        let (p, q) = (&self.points[a], &self.points[b]);
        (p.x - q.x).hypot(p.y - q.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_both_spellings() {
        assert_eq!("PCA".parse::<Algorithm>().unwrap(), Algorithm::Pca);
        assert_eq!("t-sne".parse::<Algorithm>().unwrap(), Algorithm::Tsne);
        assert_eq!("tsne".parse::<Algorithm>().unwrap(), Algorithm::Tsne);
        assert!("umap".parse::<Algorithm>().is_err());
    }

    #[test]
    fn dominant_cluster_is_argmax() {
        let record = EmbeddingRecord {
            sample: "a".into(),
            sample_index: 0,
            vector: vec![0.1, 0.7, 0.2],
        };
        assert_eq!(record.dominant_cluster(), Some(1));
        assert_eq!(record.dimension(), 3);
    }
}
