// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Three families, matching when they can happen:
//
//   ArtifactLoadError — at start-up or reload. Fatal: no service
//                       exists without all four artifacts.
//   RequestError      — per request, before the prediction is
//                       returned. The next request is unaffected.
//   LogWriteError     — after the prediction. Reported next to the
//                       prediction, never instead of it.

use std::path::PathBuf;
use thiserror::Error;

/// One of the persisted encoder/model files could not be loaded.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact '{}' is missing; run `train` first", .path.display())]
    Missing { path: PathBuf },

    #[error("artifact '{}' could not be read: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact '{}' is incompatible: {reason}", .path.display())]
    Incompatible { path: PathBuf, reason: String },
}

/// A single prediction request failed.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("unknown {field} '{value}': not one of the categories the model was trained on")]
    UnknownCategory { field: &'static str, value: String },

    #[error(
        "feature shape mismatch: the model expects {expected} features but {actual} were assembled \
         (model and encoders are from different versions)"
    )]
    FeatureShape { expected: usize, actual: usize },

    #[error(
        "the model returned class code {code} but the rating encoder knows {known} ratings \
         (model and encoders are from different versions)"
    )]
    ClassOutOfRange { code: usize, known: usize },
}

impl RequestError {
    /// True when the caller can fix the request; false when the
    /// loaded artifacts are misconfigured.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            RequestError::InvalidInput { .. } | RequestError::UnknownCategory { .. }
        )
    }
}

/// Appending to (or reading) the prediction log failed.
#[derive(Debug, Error)]
pub enum LogWriteError {
    #[error("prediction log '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "prediction log '{}' has columns {found:?}, expected {expected:?}; run `migrate-log` first",
        .path.display()
    )]
    SchemaMismatch {
        path:     PathBuf,
        found:    Vec<String>,
        expected: Vec<String>,
    },

    #[error("prediction log '{}': malformed CSV: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("prediction log '{}' cannot be migrated: {reason}", .path.display())]
    Unmigratable { path: PathBuf, reason: String },
}
