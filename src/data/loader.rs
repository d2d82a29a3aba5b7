// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads the labelled credit dataset:
//
//   Issuer Name,Industry,Debt to Equity,EBITDA Margin,
//   Interest Coverage,Issue Size (₹Cr),DefaultFlag,Final Rating
//
// Rows are deserialized by header name, so column order in the
// file does not matter and extra columns are ignored. A row that
// fails to parse aborts the load with its line number; training on
// a silently filtered dataset would change the fitted classes.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::domain::record::CreditRecord;
use crate::domain::traits::RecordSource;

/// Loads CreditRecords from one CSV file.
pub struct CsvDatasetLoader {
    path: PathBuf,
}

impl CsvDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvDatasetLoader {
    fn load_all(&self) -> Result<Vec<CreditRecord>> {
        if !self.path.exists() {
            bail!("Dataset '{}' does not exist", self.path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let columns: Vec<String> = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", self.path.display()))?
            .iter()
            .map(str::to_string)
            .collect();
        tracing::info!("Columns in dataset: {:?}", columns);

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<CreditRecord>().enumerate() {
            // +2: one for the header, one for 1-based numbering
            let line = i + 2;
            let record = row.with_context(|| {
                format!("Malformed row at line {} of '{}'", line, self.path.display())
            })?;
            records.push(record);
        }

        if records.is_empty() {
            bail!("Dataset '{}' has no rows", self.path.display());
        }

        tracing::info!("Loaded {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}
