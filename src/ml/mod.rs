// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All classifier code lives here:
//
//   encoder.rs    — LabelEncoder: sorted label ↔ code bijection
//
//   tree.rs       — one CART classification tree (Gini impurity,
//                   random feature subsets per node)
//
//   forest.rs     — RandomForest: bootstrap ensemble of trees,
//                   averaged leaf distributions
//
//   trainer.rs    — fits the forest on the training split and
//                   scores it on both splits
//
//   inferencer.rs — turns a validated request into a FeatureVector,
//                   checks its width against the model, predicts
//                   and decodes the rating

/// Label encoders for issuer, industry and rating
pub mod encoder;

/// CART decision tree
pub mod tree;

/// Random forest classifier
pub mod forest;

/// Fit + evaluate
pub mod trainer;

/// Request → rating
pub mod inferencer;

#[cfg(test)]
pub mod fixtures;
