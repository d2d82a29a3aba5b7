// ============================================================
// Layer 2 — History Use Case
// ============================================================
// Read-side of the prediction log: list past predictions and run
// the one-off migration of legacy log layouts.

use crate::domain::error::LogWriteError;
use crate::domain::record::PredictionLogEntry;
use crate::infra::prediction_log::{MigrationReport, PredictionLog};

pub struct HistoryUseCase {
    log: PredictionLog,
}

impl HistoryUseCase {
    pub fn new(log: PredictionLog) -> Self {
        Self { log }
    }

    /// Past predictions, oldest first; only the last `limit` when given.
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<PredictionLogEntry>, LogWriteError> {
        let mut rows = self.log.read_all()?;
        if let Some(n) = limit {
            let skip = rows.len().saturating_sub(n);
            rows.drain(..skip);
        }
        Ok(rows)
    }

    pub fn migrate(&self) -> Result<MigrationReport, LogWriteError> {
        self.log.migrate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::fixtures;

    #[test]
    fn test_recent_keeps_the_newest_rows() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("history.csv"));
        for rating in ["AAA", "AA", "A"] {
            log.append(&PredictionLogEntry::new(&fixtures::acme_retail(), rating)).unwrap();
        }

        let history = HistoryUseCase::new(log);
        let last_two: Vec<String> = history
            .recent(Some(2))
            .unwrap()
            .into_iter()
            .map(|e| e.predicted_rating)
            .collect();
        assert_eq!(last_two, vec!["AA", "A"]);
        assert_eq!(history.recent(None).unwrap().len(), 3);
        assert_eq!(history.recent(Some(10)).unwrap().len(), 3);
    }
}
