use crate::config::ProjectionConfig;
use crate::error::{ClusterError, Result};
use crate::projection::{Pca, Projector, Tsne};
use crate::types::{Algorithm, EmbeddingRecord, ProjectedPoint, Projection};
use ndarray::Array2;

/// Minimum number of records for a 2-D projection
pub const MIN_PROJECTION_RECORDS: usize = 2;

/// Append-only collection of embedding records for one session.
///
/// Records are never removed or deduplicated. Projections are recomputed from
/// every record on each request; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct ClusterStore {
    records: Vec<EmbeddingRecord>,
}

impl ClusterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. The store grows by exactly one on success; the only
    /// failure is a vector whose dimension differs from earlier records.
    pub fn add_sample(&mut self, record: EmbeddingRecord) -> Result<usize> {
        if let Some(expected) = self.dimension() {
            if record.dimension() != expected {
                return Err(ClusterError::InvalidDimension {
                    expected,
                    actual: record.dimension(),
                });
            }
        }
        self.records.push(record);
        log::info!("Cluster store now holds {} records", self.records.len());
        Ok(self.records.len() - 1)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&EmbeddingRecord> {
        self.records.last()
    }

    /// Dimension shared by every record, `None` while empty
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(EmbeddingRecord::dimension)
    }

    /// Whether a sample identity has been stored before
    #[must_use]
    pub fn contains_sample(&self, sample: &str) -> bool {
        self.records.iter().any(|r| r.sample == sample)
    }

    /// Records as an `n × d` matrix
    #[must_use]
    pub fn matrix(&self) -> Array2<f64> {
        let cols = self.dimension().unwrap_or(0);
        Array2::from_shape_fn((self.records.len(), cols), |(i, j)| {
            f64::from(self.records[i].vector[j])
        })
    }

    /// Project every record to 2-D with the given algorithm
    pub fn get_projection(
        &self,
        algorithm: Algorithm,
        config: &ProjectionConfig,
    ) -> Result<Projection> {
        if self.records.len() < MIN_PROJECTION_RECORDS {
            return Err(ClusterError::InsufficientData {
                required: MIN_PROJECTION_RECORDS,
                actual: self.records.len(),
            });
        }

        let data = self.matrix();
        log::debug!(
            "Projecting {}x{} embeddings with {}",
            data.nrows(),
            data.ncols(),
            algorithm.label()
        );
        let coords = match algorithm {
            Algorithm::Pca => Pca.project(&data)?,
            Algorithm::Tsne => Tsne::from_config(config).project(&data)?,
        };

        let points = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| ProjectedPoint {
                x: coords[[i, 0]],
                y: coords[[i, 1]],
                record_index: i,
                sample: record.sample.clone(),
            })
            .collect();

        Ok(Projection { algorithm, points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sample: &str, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            sample: sample.to_string(),
            sample_index: 0,
            vector,
        }
    }

    #[test]
    fn duplicates_still_grow_the_store() {
        let mut store = ClusterStore::new();
        for _ in 0..3 {
            store.add_sample(record("same.json", vec![1.0, 0.0])).unwrap();
        }
        assert_eq!(store.size(), 3);
        assert!(store.contains_sample("same.json"));
        assert!(!store.contains_sample("other.json"));
    }

    #[test]
    fn mismatched_dimension_is_rejected() {
        let mut store = ClusterStore::new();
        store.add_sample(record("a", vec![1.0, 0.0])).unwrap();
        let err = store.add_sample(record("b", vec![1.0])).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidDimension {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn projection_needs_two_records() {
        let mut store = ClusterStore::new();
        let config = ProjectionConfig::default();
        for algorithm in [Algorithm::Pca, Algorithm::Tsne] {
            assert!(matches!(
                store.get_projection(algorithm, &config),
                Err(ClusterError::InsufficientData { actual: 0, .. })
            ));
        }
        store.add_sample(record("a", vec![1.0, 0.0])).unwrap();
        for algorithm in [Algorithm::Pca, Algorithm::Tsne] {
            assert!(matches!(
                store.get_projection(algorithm, &config),
                Err(ClusterError::InsufficientData { actual: 1, .. })
            ));
        }
    }

    #[test]
    fn matrix_keeps_store_order() {
        let mut store = ClusterStore::new();
        store.add_sample(record("a", vec![1.0, 2.0])).unwrap();
        store.add_sample(record("b", vec![3.0, 4.0])).unwrap();
        let m = store.matrix();
        assert_eq!(m.shape(), &[2, 2]);
        assert_eq!(m[[1, 0]], 3.0);
        assert_eq!(store.last().map(|r| r.sample.as_str()), Some("b"));
    }
}
