use codenn_ast::SourceSample;
use codenn_cluster::{
    Algorithm, ClusterError, ClusterStore, EmbeddingPipeline, EmbeddingRecord, ModelConfig,
    ProjectionConfig, SoftClusterModel,
};
use pretty_assertions::assert_eq;

fn one_hot(sample: &str, hot: usize) -> EmbeddingRecord {
    let mut vector = vec![0.0; 3];
    vector[hot] = 1.0;
    EmbeddingRecord {
        sample: sample.to_string(),
        sample_index: hot,
        vector,
    }
}

fn one_hot_store() -> ClusterStore {
    let mut store = ClusterStore::new();
    for (i, name) in ["a.lua", "b.lua", "c.lua"].iter().enumerate() {
        store.add_sample(one_hot(name, i)).unwrap();
    }
    store
}

#[test]
fn pca_places_one_hot_records_equidistant() {
    let projection = one_hot_store()
        .get_projection(Algorithm::Pca, &ProjectionConfig::default())
        .unwrap();

    assert_eq!(projection.len(), 3);
    let d01 = projection.distance(0, 1);
    assert!((d01 - projection.distance(0, 2)).abs() < 1e-9);
    assert!((d01 - projection.distance(1, 2)).abs() < 1e-9);

    let samples: Vec<_> = projection.points.iter().map(|p| p.sample.as_str()).collect();
    assert_eq!(samples, vec!["a.lua", "b.lua", "c.lua"]);
}

#[test]
fn pca_projection_is_stable_without_new_records() {
    let store = one_hot_store();
    let config = ProjectionConfig::default();
    let first = store.get_projection(Algorithm::Pca, &config).unwrap();
    let second = store.get_projection(Algorithm::Pca, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn tsne_projection_is_reproducible_per_seed() {
    let store = one_hot_store();
    let config = ProjectionConfig {
        tsne_iterations: 200,
        ..ProjectionConfig::default()
    };
    let first = store.get_projection(Algorithm::Tsne, &config).unwrap();
    let second = store.get_projection(Algorithm::Tsne, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.algorithm, Algorithm::Tsne);
}

#[test]
fn projection_covers_every_record_including_duplicates() {
    let pipeline = EmbeddingPipeline::new(Box::new(SoftClusterModel::seeded(
        &ModelConfig::default(),
    )));
    let sample = SourceSample::from_strings(
        r#"{"url":"https://example.com/a.lua","nodes":[
            {"category":"variable","order_index":0,"position":1,"characters_count":5}
        ]}"#,
        "local x = 1",
    )
    .unwrap();

    let mut store = ClusterStore::new();
    for k in 1..=4 {
        pipeline.submit(&sample, &mut store).unwrap();
        assert_eq!(store.size(), k);
    }

    let projection = store
        .get_projection(Algorithm::Pca, &ProjectionConfig::default())
        .unwrap();
    assert_eq!(projection.len(), 4);
    assert!(projection
        .points
        .iter()
        .all(|p| p.sample == "https://example.com/a.lua"));
}

#[test]
fn empty_and_single_record_stores_cannot_project() {
    let config = ProjectionConfig::default();
    let mut store = ClusterStore::new();
    let err = store.get_projection(Algorithm::Pca, &config).unwrap_err();
    assert!(matches!(
        err,
        ClusterError::InsufficientData {
            required: 2,
            actual: 0
        }
    ));
    assert_eq!(err.kind(), "insufficient_data");

    store.add_sample(one_hot("a.lua", 0)).unwrap();
    assert!(matches!(
        store.get_projection(Algorithm::Tsne, &config),
        Err(ClusterError::InsufficientData { actual: 1, .. })
    ));
}
