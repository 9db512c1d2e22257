use crate::encoding::ModelInput;
use crate::error::{ClusterError, Result};
use crate::model::EmbeddingModel;
use crate::store::ClusterStore;
use crate::types::EmbeddingRecord;
use codenn_ast::SourceSample;

/// Encodes samples, runs the model and hands the vectors to a store
pub struct EmbeddingPipeline {
    model: Box<dyn EmbeddingModel>,
}

impl EmbeddingPipeline {
    #[must_use]
    pub fn new(model: Box<dyn EmbeddingModel>) -> Self {
        log::info!(
            "Embedding model '{}' ready (dimension {}, sequence length {})",
            model.id(),
            model.dimension(),
            model.sequence_length()
        );
        Self { model }
    }

    #[must_use]
    pub fn model(&self) -> &dyn EmbeddingModel {
        self.model.as_ref()
    }

    /// Embed one sample without storing it
    pub fn embed(&self, sample: &SourceSample, sample_index: usize) -> Result<EmbeddingRecord> {
        let input = ModelInput::encode(sample, self.model.sequence_length())?;
        if input.is_truncated() {
            log::warn!(
                "{} has more nodes than the model sequence length {}; tail ignored",
                sample.identity(),
                self.model.sequence_length()
            );
        }

        let vector = self.model.embed(&input)?;
        if vector.len() != self.model.dimension() {
            return Err(ClusterError::InvalidDimension {
                expected: self.model.dimension(),
                actual: vector.len(),
            });
        }

        Ok(EmbeddingRecord {
            sample: sample.identity(),
            sample_index,
            vector,
        })
    }

    /// Embed a sample and append it to the store.
    ///
    /// Returns the new record's index. On error the store is unchanged.
    pub fn submit(&self, sample: &SourceSample, store: &mut ClusterStore) -> Result<usize> {
        let record = self.embed(sample, store.size())?;
        store.add_sample(record)
    }
}

impl std::fmt::Debug for EmbeddingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingPipeline")
            .field("model", &self.model.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::model::SoftClusterModel;

    fn sample(path: &str) -> SourceSample {
        let sidecar = format!(
            r#"{{"path":"{path}","nodes":[
                {{"category":"require","order_index":0,"position":1,"characters_count":3}},
                {{"category":"function","order_index":1,"position":5,"characters_count":4}}
            ]}}"#
        );
        SourceSample::from_strings(&sidecar, "req func").unwrap()
    }

    fn pipeline() -> EmbeddingPipeline {
        let config = ModelConfig {
            sequence_length: 16,
            ..ModelConfig::default()
        };
        EmbeddingPipeline::new(Box::new(SoftClusterModel::seeded(&config)))
    }

    #[test]
    fn submit_appends_one_record() {
        let pipeline = pipeline();
        let mut store = ClusterStore::new();
        assert_eq!(pipeline.submit(&sample("a.lua"), &mut store).unwrap(), 0);
        assert_eq!(pipeline.submit(&sample("a.lua"), &mut store).unwrap(), 1);
        assert_eq!(store.size(), 2);
        assert_eq!(store.records()[1].sample_index, 1);
        assert_eq!(store.records()[0].vector, store.records()[1].vector);
    }

    #[test]
    fn failing_model_leaves_store_untouched() {
        struct Broken;
        impl EmbeddingModel for Broken {
            fn id(&self) -> &str {
                "broken"
            }
            fn dimension(&self) -> usize {
                4
            }
            fn sequence_length(&self) -> usize {
                8
            }
            fn embed(&self, _input: &ModelInput) -> Result<Vec<f32>> {
                Ok(vec![0.5; 3])
            }
        }

        let pipeline = EmbeddingPipeline::new(Box::new(Broken));
        let mut store = ClusterStore::new();
        let err = pipeline.submit(&sample("a.lua"), &mut store).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidDimension { expected: 4, actual: 3 }));
        assert!(store.is_empty());
    }
}
