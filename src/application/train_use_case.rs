// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the labelled dataset        (Layer 4 - data)
//   Step 2: Fit the three label encoders     (Layer 4 - data)
//   Step 3: Encode rows into FeatureVectors  (Layer 4 - data)
//   Step 4: Seeded train/hold-out split      (Layer 4 - data)
//   Step 5: Fit + score the random forest    (Layer 5 - ml)
//   Step 6: Save config, artifacts, metrics  (Layer 6 - infra)
//
// Encoders are fitted on the FULL dataset before the split, so a
// category that only occurs in hold-out rows still gets a code.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{encode_records, TrainingEncoders},
    loader::CsvDatasetLoader,
    splitter::split_holdout,
};
use crate::domain::traits::RecordSource;
use crate::infra::{
    artifacts::{ArtifactStore, Artifacts},
    metrics::{MetricsLogger, TrainingMetrics},
};
use crate::ml::{forest::ForestConfig, trainer::run_training};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything that determines a training run. Saved next to the
// artifacts as train_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:      String,
    pub artifact_dir:      String,
    pub n_estimators:      usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub max_features:      Option<usize>,
    pub test_fraction:     f64,
    pub seed:              u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:      "Simulated_CreditRating_Data.csv".to_string(),
            artifact_dir:      "artifacts".to_string(),
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            max_features:      None,
            test_fraction:     0.2,
            seed:              42,
        }
    }
}

impl TrainConfig {
    pub fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_estimators:      self.n_estimators,
            max_depth:         self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features:      self.max_features,
            seed:              self.seed,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline end to end and return the run's metrics.
    pub fn execute(&self) -> Result<TrainingMetrics> {
        let cfg = &self.config;
        if !(0.0..1.0).contains(&cfg.test_fraction) {
            bail!("test_fraction must be in [0, 1), got {}", cfg.test_fraction);
        }

        // ── Step 1: Load the dataset ──────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.dataset_path);
        let records = CsvDatasetLoader::new(&cfg.dataset_path).load_all()?;
        if records.len() < 2 {
            bail!("Need at least 2 rows to train, found {}", records.len());
        }

        // ── Step 2: Fit encoders on every row ─────────────────────────────────
        let encoders = TrainingEncoders::fit(&records);
        tracing::info!(
            "Encoders fitted: {} issuers, {} industries, {} ratings {:?}",
            encoders.issuer.len(),
            encoders.industry.len(),
            encoders.rating.len(),
            encoders.rating.classes(),
        );

        // ── Step 3: Encode ────────────────────────────────────────────────────
        let samples = encode_records(&records, &encoders)?;

        // ── Step 4: Hold out test_fraction of the rows ────────────────────────
        let (train, holdout) = split_holdout(samples, cfg.test_fraction, cfg.seed);
        if train.is_empty() {
            bail!("test_fraction {} leaves no rows to train on", cfg.test_fraction);
        }
        tracing::info!("Split: {} train, {} hold-out", train.len(), holdout.len());

        // ── Step 5: Fit and score ─────────────────────────────────────────────
        let (model, metrics) = run_training(&train, &holdout, encoders.rating.len(), &cfg.forest())?;

        // ── Step 6: Persist ───────────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.artifact_dir);
        store.save_config(cfg)?;
        store.save(&Artifacts {
            issuer:   encoders.issuer,
            industry: encoders.industry,
            rating:   encoders.rating,
            model,
        })?;
        MetricsLogger::new(&cfg.artifact_dir)?.log(&metrics)?;

        Ok(metrics)
    }
}
