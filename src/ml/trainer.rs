// ============================================================
// Layer 5 — Training
// ============================================================
// Fits the forest on the training split, then measures accuracy
// on both splits. The hold-out split never influences the fit.

use anyhow::Result;

use crate::data::dataset::{to_matrix, EncodedSample};
use crate::domain::traits::RatingClassifier;
use crate::infra::metrics::TrainingMetrics;
use crate::ml::forest::{ForestConfig, RandomForest};

pub fn run_training(
    train:     &[EncodedSample],
    holdout:   &[EncodedSample],
    n_classes: usize,
    cfg:       &ForestConfig,
) -> Result<(RandomForest, TrainingMetrics)> {
    let (rows, labels) = to_matrix(train);

    tracing::info!(
        "Fitting random forest: {} trees on {} rows ({} classes)",
        cfg.n_estimators, rows.len(), n_classes,
    );
    let forest = RandomForest::fit(&rows, &labels, n_classes, cfg)?;

    let metrics = TrainingMetrics {
        n_train:          train.len(),
        n_holdout:        holdout.len(),
        n_trees:          forest.tree_count(),
        train_accuracy:   accuracy(&forest, train),
        holdout_accuracy: accuracy(&forest, holdout),
    };

    tracing::info!(
        "Training accuracy {:.1}%, hold-out accuracy {:.1}%",
        metrics.train_accuracy * 100.0,
        metrics.holdout_accuracy * 100.0,
    );
    if metrics.is_overfit(0.2) {
        tracing::warn!("Hold-out accuracy trails training accuracy by more than 20 points");
    }

    Ok((forest, metrics))
}

/// Fraction of `samples` classified correctly; NaN for no samples.
pub fn accuracy(model: &dyn RatingClassifier, samples: &[EncodedSample]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let correct = samples
        .iter()
        .filter(|s| model.predict_code(&s.features.to_row()) == s.label)
        .count();
    correct as f64 / samples.len() as f64
}
