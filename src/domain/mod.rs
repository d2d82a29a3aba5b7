// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what a credit
// rating request IS:
//
//   features.rs — the fixed-order FeatureVector both training and
//                 inference assemble, and its column contract
//   record.rs   — a labelled training row, a rating request, and
//                 one row of the prediction log
//   error.rs    — the error taxonomy surfaced to callers
//   traits.rs   — seams other layers implement
//
// No file I/O and no classifier internals live here.

pub mod features;

pub mod record;

pub mod error;

pub mod traits;
