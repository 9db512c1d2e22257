use crate::config::{DuplicatePolicy, VisConfig};
use codenn_ast::{SampleLocator, SourceSample};
use codenn_cluster::{
    Algorithm, ClusterError, ClusterStore, EmbeddingPipeline, EmbeddingRecord, SoftClusterModel,
};
use codenn_scene::{
    render_clusters, render_prediction, Result, SampleViews, Scene, SceneError, CLUSTER_TITLE,
    PREDICTION_TITLE,
};
use serde::Serialize;

/// Everything produced by one submission
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    #[serde(flatten)]
    pub views: SampleViews,
    pub prediction: Scene,
    pub clusters: Scene,
    /// False when the duplicate policy skipped embedding
    pub embedded: bool,
    pub store_size: usize,
}

/// Per-session state: the current sample, its rendered views and the cluster
/// store. Handlers receive it explicitly.
pub struct Session {
    config: VisConfig,
    pipeline: EmbeddingPipeline,
    store: ClusterStore,
    current: Option<SourceSample>,
    views: Option<SampleViews>,
}

impl Session {
    pub fn new(config: VisConfig) -> Result<Self> {
        let model = SoftClusterModel::from_config(&config.model)?;
        Ok(Self::with_pipeline(
            config,
            EmbeddingPipeline::new(Box::new(model)),
        ))
    }

    #[must_use]
    pub fn with_pipeline(config: VisConfig, pipeline: EmbeddingPipeline) -> Self {
        Self {
            config,
            pipeline,
            store: ClusterStore::new(),
            current: None,
            views: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &VisConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &ClusterStore {
        &self.store
    }

    #[must_use]
    pub const fn current(&self) -> Option<&SourceSample> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn views(&self) -> Option<&SampleViews> {
        self.views.as_ref()
    }

    /// Load a sample and render its views without touching the store
    pub fn open(&mut self, locator: SampleLocator) -> Result<&SampleViews> {
        let sample = SourceSample::load(locator, &self.config.sample)?;
        let views = SampleViews::render(&sample, &self.config.scene)?;
        self.current = Some(sample);
        Ok(self.views.insert(views))
    }

    /// Load, render, embed and re-project.
    ///
    /// On any error the session keeps its previous sample and views. Errors
    /// raised before embedding leave the store unchanged; once the record is
    /// appended it stays, so a failed projection returns the error with the
    /// store already one larger.
    pub fn submit(&mut self, locator: SampleLocator) -> Result<SampleReport> {
        let sample = SourceSample::load(locator, &self.config.sample)?;
        let views = SampleViews::render(&sample, &self.config.scene)?;
        let identity = sample.identity();

        let skip = self.config.session.duplicate_policy == DuplicatePolicy::SkipSeen
            && self.store.contains_sample(&identity);
        if skip {
            log::info!("{identity} already in the cluster store; not embedding again");
        } else {
            self.pipeline.submit(&sample, &mut self.store)?;
        }

        let prediction = self
            .latest_record(&identity)
            .map_or_else(|| Scene::empty(PREDICTION_TITLE), |record| {
                render_prediction(record, &self.config.scene)
            });
        let clusters = self.cluster_scene_or_empty(self.config.projection.default_algorithm)?;

        self.current = Some(sample);
        self.views = Some(views.clone());

        Ok(SampleReport {
            views,
            prediction,
            clusters,
            embedded: !skip,
            store_size: self.store.size(),
        })
    }

    /// Cluster diagram over the whole store
    pub fn clusters(&self, algorithm: Option<Algorithm>) -> Result<Scene> {
        let algorithm = algorithm.unwrap_or(self.config.projection.default_algorithm);
        let projection = self
            .store
            .get_projection(algorithm, &self.config.projection)?;
        render_clusters(&projection, self.store.records(), &self.config.scene)
    }

    fn cluster_scene_or_empty(&self, algorithm: Algorithm) -> Result<Scene> {
        match self.clusters(Some(algorithm)) {
            Err(SceneError::Cluster(ClusterError::InsufficientData { actual, .. })) => {
                log::info!("Cluster diagram needs more samples (store has {actual})");
                Ok(Scene::empty(CLUSTER_TITLE))
            }
            other => other,
        }
    }

    fn latest_record(&self, identity: &str) -> Option<&EmbeddingRecord> {
        self.store
            .records()
            .iter()
            .rev()
            .find(|record| record.sample == identity)
    }
}
