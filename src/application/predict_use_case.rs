// ============================================================
// Layer 2 — Prediction Service
// ============================================================
// The explicit, process-wide context for answering rating
// requests:
//
//   open()    → load all four artifacts (or fail), prepare the log
//   predict() → validate → encode → classify → decode → append
//   reload()  → load a fresh artifact set, swap only on success
//
// The artifacts are immutable once loaded and shared behind an
// Arc; the log serializes its own appends. `predict` takes &self,
// so one service can be shared across threads.
//
// Error flow for one request:
//   - validation / unknown category / shape → Err, nothing logged
//   - log append failure → Ok, with the failure in `logged`

use std::path::PathBuf;

use crate::domain::error::{ArtifactLoadError, LogWriteError, RequestError};
use crate::domain::record::{InputLimits, PredictionLogEntry, RatingRequest};
use crate::infra::{artifacts::ArtifactStore, prediction_log::PredictionLog};
use crate::ml::inferencer::{Inferencer, Prediction, UnknownIssuerPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub artifact_dir:   PathBuf,
    pub log_path:       PathBuf,
    pub unknown_issuer: UnknownIssuerPolicy,
    pub limits:         InputLimits,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            artifact_dir:   PathBuf::from("artifacts"),
            log_path:       PathBuf::from("prediction_history.csv"),
            unknown_issuer: UnknownIssuerPolicy::default(),
            limits:         InputLimits::default(),
        }
    }
}

/// A computed prediction plus the fate of its log row.
#[derive(Debug)]
pub struct PredictionOutcome {
    pub prediction: Prediction,
    pub logged:     Result<(), LogWriteError>,
}

pub struct RatingService {
    store:      ArtifactStore,
    inferencer: Inferencer,
    log:        PredictionLog,
    limits:     InputLimits,
}

impl RatingService {
    /// Load artifacts and prepare the log. Any artifact failure is
    /// fatal; a log problem is only warned about here and surfaces
    /// again on each append.
    pub fn open(cfg: ServiceConfig) -> Result<Self, ArtifactLoadError> {
        let store      = ArtifactStore::new(cfg.artifact_dir);
        let inferencer = Inferencer::from_store(&store, cfg.unknown_issuer)?;
        let log        = PredictionLog::new(cfg.log_path);

        if let Err(e) = log.ensure_created() {
            tracing::warn!("Prediction log is not usable: {e}");
        }

        Ok(Self { store, inferencer, log, limits: cfg.limits })
    }

    pub fn predict(&self, request: &RatingRequest) -> Result<PredictionOutcome, RequestError> {
        request.validate(&self.limits)?;

        let prediction = self.inferencer.predict(request)?;

        let entry  = PredictionLogEntry::new(request, prediction.rating.clone());
        let logged = self.log.append(&entry);
        if let Err(e) = &logged {
            tracing::warn!("Prediction {} not logged: {e}", prediction.rating);
        }

        Ok(PredictionOutcome { prediction, logged })
    }

    /// Replace the loaded artifacts with what is on disk now. On
    /// failure the current artifacts stay in service.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn reload(&mut self) -> Result<(), ArtifactLoadError> {
        let fresh = Inferencer::from_store(&self.store, self.inferencer.policy())?;
        self.inferencer = fresh;
        tracing::info!("Reloaded artifacts from '{}'", self.store.dir().display());
        Ok(())
    }

    #[cfg(test)]
    pub fn artifacts(&self) -> &crate::infra::artifacts::Artifacts {
        self.inferencer.artifacts()
    }

    #[cfg(test)]
    pub fn log(&self) -> &PredictionLog {
        &self.log
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::artifacts::RATING_ENCODER_FILE;
    use crate::ml::fixtures;
    use std::{fs, sync::Arc};

    fn setup(dir: &std::path::Path, policy: UnknownIssuerPolicy) -> RatingService {
        let artifact_dir = dir.join("artifacts");
        ArtifactStore::new(&artifact_dir).save(&fixtures::artifacts()).unwrap();
        RatingService::open(ServiceConfig {
            artifact_dir,
            log_path:       dir.join("history.csv"),
            unknown_issuer: policy,
            limits:         InputLimits::default(),
        })
        .unwrap()
    }

    fn data_rows(service: &RatingService) -> usize {
        service.log().read_all().unwrap().len()
    }

    #[test]
    fn test_open_without_artifacts_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = RatingService::open(ServiceConfig {
            artifact_dir: dir.path().join("empty"),
            log_path:     dir.path().join("history.csv"),
            ..ServiceConfig::default()
        });
        assert!(matches!(result, Err(ArtifactLoadError::Missing { .. })));
    }

    #[test]
    fn test_open_creates_log_with_header() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Reject);
        assert!(service.log().path().exists());
        assert_eq!(data_rows(&service), 0);
    }

    #[test]
    fn test_prediction_appends_one_matching_row() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Reject);

        let outcome = service.predict(&fixtures::acme_retail()).unwrap();
        assert!(outcome.logged.is_ok());
        assert_eq!(outcome.prediction.rating, "BB");

        let rows = service.log().read_all().unwrap();
        assert_eq!(rows, vec![PredictionLogEntry::new(&fixtures::acme_retail(), "BB")]);
    }

    #[test]
    fn test_invalid_input_blocks_before_model_and_log() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Reject);

        let mut req = fixtures::acme_retail();
        req.financials.interest_coverage = -1.0;
        let err = service.predict(&req).unwrap_err();
        assert!(err.is_bad_input());
        assert_eq!(data_rows(&service), 0);
    }

    #[test]
    fn test_unknown_issuer_reject_is_request_level() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Reject);

        let mut req = fixtures::acme_retail();
        req.issuer_name = "Unknown Corp".into();
        assert!(matches!(service.predict(&req), Err(RequestError::UnknownCategory { field: "issuer", .. })));

        // The service keeps working
        assert!(service.predict(&fixtures::acme_retail()).is_ok());
        assert_eq!(data_rows(&service), 1);
    }

    #[test]
    fn test_unknown_issuer_sentinel_predicts_and_logs() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Sentinel);

        let mut req = fixtures::acme_retail();
        req.issuer_name = "Unknown Corp".into();
        let outcome = service.predict(&req).unwrap();
        assert_eq!(outcome.prediction.rating, "BB");
        assert_eq!(service.log().read_all().unwrap()[0].issuer_name, "Unknown Corp");
    }

    #[test]
    fn test_log_failure_still_returns_prediction() {
        let dir     = tempfile::tempdir().unwrap();
        let service = setup(dir.path(), UnknownIssuerPolicy::Reject);
        service.predict(&fixtures::acme_retail()).unwrap();

        // Replace the log with a foreign schema
        let foreign = "Issuer,Rating\nAcme Co,BB\n";
        fs::write(service.log().path(), foreign).unwrap();

        let outcome = service.predict(&fixtures::acme_retail()).unwrap();
        assert_eq!(outcome.prediction.rating, "BB");
        assert!(matches!(outcome.logged, Err(LogWriteError::SchemaMismatch { .. })));
        assert_eq!(fs::read_to_string(service.log().path()).unwrap(), foreign);
    }

    #[test]
    fn test_reload_keeps_old_artifacts_on_failure() {
        let dir         = tempfile::tempdir().unwrap();
        let mut service = setup(dir.path(), UnknownIssuerPolicy::Reject);

        fs::remove_file(dir.path().join("artifacts").join(RATING_ENCODER_FILE)).unwrap();
        assert!(service.reload().is_err());
        assert_eq!(service.predict(&fixtures::acme_retail()).unwrap().prediction.rating, "BB");

        ArtifactStore::new(dir.path().join("artifacts")).save(&fixtures::artifacts()).unwrap();
        service.reload().unwrap();
        assert_eq!(service.artifacts().rating.len(), 2);
    }

    #[test]
    fn test_shared_service_across_threads() {
        let dir     = tempfile::tempdir().unwrap();
        let service = Arc::new(setup(dir.path(), UnknownIssuerPolicy::Reject));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        let outcome = service.predict(&fixtures::acme_retail()).unwrap();
                        assert!(outcome.logged.is_ok());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let rows = service.log().read_all().unwrap();
        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|r| r.predicted_rating == "BB"));
    }
}
