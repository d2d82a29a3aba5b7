// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the file system:
//
//   artifacts.rs      — the four persisted artifacts (three label
//                       encoders + the forest) as bincode
//                       envelopes, plus the training config as
//                       JSON
//
//   prediction_log.rs — the append-only CSV of past predictions:
//                       fixed header, serialized appends, reading
//                       back, and migration of legacy layouts
//
//   metrics.rs        — one CSV row of accuracy figures per
//                       training run

/// Artifact saving and loading
pub mod artifacts;

/// Prediction history CSV
pub mod prediction_log;

/// Training metrics CSV logger
pub mod metrics;
