// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one row per training run to <artifact-dir>/metrics.csv:
//
//   n_train,n_holdout,n_trees,train_accuracy,holdout_accuracy
//   160,40,100,1.000000,0.875000
//   ...
//
// The file accumulates across runs; the last row describes the
// artifacts currently on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// Accuracy figures for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub n_train: usize,

    /// Zero when the whole dataset was used for fitting
    pub n_holdout: usize,

    pub n_trees: usize,

    /// Fraction of training rows the fitted forest classifies correctly
    pub train_accuracy: f64,

    /// Same on the held-out rows; NaN when there are none
    pub holdout_accuracy: f64,
}

impl TrainingMetrics {
    /// True when the forest does markedly better on rows it was
    /// fitted on than on held-out rows
    pub fn is_overfit(&self, tolerance: f64) -> bool {
        !self.holdout_accuracy.is_nan() && self.train_accuracy - self.holdout_accuracy > tolerance
    }
}

/// Appends training metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory and the CSV header if they don't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "n_train,n_holdout,n_trees,train_accuracy,holdout_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Open an existing metrics file without creating anything.
    pub fn existing(dir: impl Into<PathBuf>) -> Option<Self> {
        let csv_path = dir.into().join("metrics.csv");
        csv_path.exists().then_some(Self { csv_path })
    }

    pub fn log(&self, m: &TrainingMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{:.6},{:.6}",
            m.n_train,
            m.n_holdout,
            m.n_trees,
            m.train_accuracy,
            m.holdout_accuracy,
        )?;

        tracing::debug!(
            "Logged metrics: train_accuracy={:.4}, holdout_accuracy={:.4}",
            m.train_accuracy,
            m.holdout_accuracy,
        );
        Ok(())
    }

    /// The most recent run, if any has been logged.
    pub fn latest(&self) -> Result<Option<TrainingMetrics>> {
        let mut reader = csv::Reader::from_path(&self.csv_path)
            .with_context(|| format!("Cannot read '{}'", self.csv_path.display()))?;
        let mut last = None;
        for row in reader.deserialize::<TrainingMetrics>() {
            last = Some(row?);
        }
        Ok(last)
    }
}
