// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From the training CSV to encoded classifier input:
//
//   dataset CSV
//       │
//       ▼
//   CsvDatasetLoader  → reads rows into CreditRecords
//       │
//       ▼
//   encode_records    → label-encodes categories, assembles
//       │               FeatureVectors in the fixed order
//       ▼
//   split_holdout     → seeded shuffle + hold-out split
//       │
//       ▼
//   ml::trainer       → fits the forest

/// Reads the labelled training dataset with the csv crate
pub mod loader;

/// Encoded (features, label) samples
pub mod dataset;

/// Seeded shuffle and train/hold-out split
pub mod splitter;
