// ============================================================
// Layer 5 — Random Forest Classifier
// ============================================================
// An ensemble of CART trees (see tree.rs):
//
//   fit:
//     master RNG ← seed
//     for each of n_estimators trees:
//       tree RNG   ← next u64 from the master RNG
//       bootstrap  ← n draws with replacement from the n rows
//       grow tree on the bootstrap sample
//
//   predict:
//     average the leaf class distributions of all trees,
//     return the arg-max class (ties → lowest code)
//
// Every tree draws from its own RNG, so a fitted forest depends
// only on (rows, labels, config); refitting reproduces it exactly.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::traits::RatingClassifier;
use crate::ml::tree::{DecisionTree, TreeParams};

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators:      usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    /// None → floor(sqrt(n_features)), at least 1
    pub max_features:      Option<usize>,
    pub seed:              u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            max_features:      None,
            seed:              42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    n_features: usize,
    n_classes:  usize,
    trees:      Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on `rows` (all the same width) labelled with codes in
    /// `0..n_classes`.
    pub fn fit(rows: &[Vec<f64>], labels: &[usize], n_classes: usize, cfg: &ForestConfig) -> Result<Self> {
        if rows.is_empty() {
            bail!("Cannot fit a forest on zero rows");
        }
        if rows.len() != labels.len() {
            bail!("{} rows but {} labels", rows.len(), labels.len());
        }
        if cfg.n_estimators == 0 {
            bail!("n_estimators must be at least 1");
        }
        if cfg.min_samples_split < 2 {
            bail!("min_samples_split must be at least 2");
        }

        let n_features = rows[0].len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            bail!("Row {} has {} features, expected {}", i, row.len(), n_features);
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= n_classes) {
            bail!("Label code {} is outside 0..{}", bad, n_classes);
        }

        let max_features = cfg
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
            .clamp(1, n_features.max(1));

        let params = TreeParams {
            max_depth:         cfg.max_depth,
            min_samples_split: cfg.min_samples_split,
            max_features,
        };

        tracing::debug!(
            "Fitting {} trees on {} rows x {} features (max_features={})",
            cfg.n_estimators, rows.len(), n_features, max_features,
        );

        let n          = rows.len();
        let mut master = StdRng::seed_from_u64(cfg.seed);
        let trees: Vec<DecisionTree> = (0..cfg.n_estimators)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(master.gen());
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(rows, labels, bootstrap, n_classes, params, &mut rng)
            })
            .collect();

        Ok(Self { n_features, n_classes, trees })
    }

    /// Mean leaf distribution over all trees.
    pub fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.leaf_distribution(row)) {
                *p += d;
            }
        }
        let k = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= k);
        proba
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl RatingClassifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_code(&self, row: &[f64]) -> usize {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (code, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = code;
            }
        }
        best
    }
}
