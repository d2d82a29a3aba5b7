// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Summarises what is in an artifact directory: the category lists
// a data-entry form would offer, the model's shape, and the run
// that produced it.

use anyhow::Result;

use crate::application::train_use_case::TrainConfig;
use crate::domain::traits::RatingClassifier;
use crate::infra::{
    artifacts::ArtifactStore,
    metrics::{MetricsLogger, TrainingMetrics},
};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub issuers:    Vec<String>,
    pub industries: Vec<String>,
    pub ratings:    Vec<String>,
    pub n_features: usize,
    pub n_classes:  usize,
    pub n_trees:    usize,
    /// Absent for artifacts copied without their training record
    pub config:     Option<TrainConfig>,
    pub metrics:    Option<TrainingMetrics>,
}

pub struct InspectUseCase {
    store: ArtifactStore,
}

impl InspectUseCase {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    pub fn summary(&self) -> Result<ModelSummary> {
        let a = self.store.load()?;
        let metrics = match MetricsLogger::existing(self.store.dir()) {
            Some(logger) => logger.latest()?,
            None => None,
        };

        Ok(ModelSummary {
            issuers:    a.issuer.classes().to_vec(),
            industries: a.industry.classes().to_vec(),
            ratings:    a.rating.classes().to_vec(),
            n_features: a.model.n_features(),
            n_classes:  a.model.n_classes(),
            n_trees:    a.model.tree_count(),
            config:     self.store.load_config()?,
            metrics,
        })
    }
}
