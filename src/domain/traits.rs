// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The seams between layers:
//   - RecordSource     → implemented by CsvDatasetLoader (Layer 4)
//   - RatingClassifier → implemented by RandomForest (Layer 5)
//
// The application layer only talks to these traits.

use anyhow::Result;
use crate::domain::record::CreditRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that can produce labelled training records.
pub trait RecordSource {
    fn load_all(&self) -> Result<Vec<CreditRecord>>;
}

// ─── RatingClassifier ─────────────────────────────────────────────────────────
/// A fitted classifier mapping one feature row to one class code.
///
/// Implementations may assume `row.len() == n_features()`; callers
/// check the width first (see `ml::inferencer::classify`).
pub trait RatingClassifier: Send + Sync {
    /// Input width the classifier was fitted with
    fn n_features(&self) -> usize;

    /// Number of class codes; every prediction is in `0..n_classes()`
    fn n_classes(&self) -> usize;

    fn predict_code(&self, row: &[f64]) -> usize;
}
