// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Request → rating, in four steps:
//
//   1. encode   issuer + industry through the fitted encoders
//   2. assemble the FeatureVector in the fixed column order
//   3. classify after checking the row width against the model
//   4. decode   the class code through the rating encoder
//
// Unknown categories:
//   industry — always UnknownCategory
//   issuer   — UnknownCategory under Reject; under Sentinel the
//              issuer code becomes SENTINEL_ISSUER_CODE, a value
//              below every fitted code
//
// The encoders are never extended here; they are shared, read-only
// state behind an Arc.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::error::{ArtifactLoadError, RequestError};
use crate::domain::features::{FeatureVector, FEATURE_COUNT};
use crate::domain::record::RatingRequest;
use crate::domain::traits::RatingClassifier;
use crate::infra::artifacts::{ArtifactStore, Artifacts};
use crate::ml::encoder::LabelEncoder;

/// Issuer code used for issuers absent from the training data
pub const SENTINEL_ISSUER_CODE: f64 = -1.0;

/// What to do with an issuer the issuer encoder has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownIssuerPolicy {
    /// Fail the request with UnknownCategory
    #[default]
    Reject,
    /// Predict with SENTINEL_ISSUER_CODE in the issuer column
    Sentinel,
}

/// A successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub features:     FeatureVector,
    pub rating_code:  usize,
    pub rating:       String,
    /// False when the sentinel stood in for an unknown issuer
    pub issuer_known: bool,
}

pub struct Inferencer {
    artifacts: Arc<Artifacts>,
    policy:    UnknownIssuerPolicy,
}

impl Inferencer {
    pub fn new(artifacts: Arc<Artifacts>, policy: UnknownIssuerPolicy) -> Self {
        Self { artifacts, policy }
    }

    pub fn from_store(store: &ArtifactStore, policy: UnknownIssuerPolicy) -> Result<Self, ArtifactLoadError> {
        let artifacts = store.load()?;

        let width = artifacts.model.n_features();
        if width != FEATURE_COUNT {
            tracing::warn!(
                "Model in '{}' expects {} features, requests assemble {}; every prediction will fail",
                store.dir().display(),
                width,
                FEATURE_COUNT,
            );
        }
        Ok(Self::new(Arc::new(artifacts), policy))
    }

    #[cfg(test)]
    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    pub fn policy(&self) -> UnknownIssuerPolicy {
        self.policy
    }

    /// Predict a rating for an already validated request.
    pub fn predict(&self, request: &RatingRequest) -> Result<Prediction, RequestError> {
        let a = &*self.artifacts;

        let (features, issuer_known) = encode_request(request, &a.issuer, &a.industry, self.policy)?;
        let rating_code = classify(&a.model, &features.to_row())?;
        let rating      = decode_rating(&a.rating, rating_code)?;

        tracing::debug!(
            "Predicted {} (code {}) for issuer '{}' in '{}'",
            rating, rating_code, request.issuer_name, request.industry,
        );
        Ok(Prediction { features, rating_code, rating, issuer_known })
    }
}

/// Encode the categorical fields and assemble the feature vector.
/// Returns whether the issuer was known.
pub fn encode_request(
    request:  &RatingRequest,
    issuer:   &LabelEncoder,
    industry: &LabelEncoder,
    policy:   UnknownIssuerPolicy,
) -> Result<(FeatureVector, bool), RequestError> {
    let industry_code = industry
        .encode(&request.industry)
        .ok_or_else(|| RequestError::UnknownCategory {
            field: "industry",
            value: request.industry.clone(),
        })?;

    let (issuer_code, known) = match (issuer.encode(&request.issuer_name), policy) {
        (Some(code), _) => (code as f64, true),
        (None, UnknownIssuerPolicy::Reject) => {
            return Err(RequestError::UnknownCategory {
                field: "issuer",
                value: request.issuer_name.clone(),
            });
        }
        (None, UnknownIssuerPolicy::Sentinel) => {
            tracing::warn!(
                "Issuer '{}' was not in the training data; predicting with the sentinel code",
                request.issuer_name,
            );
            (SENTINEL_ISSUER_CODE, false)
        }
    };

    let features = FeatureVector::assemble(issuer_code, industry_code as f64, &request.financials);
    Ok((features, known))
}

/// Run the classifier after checking the row width. A mismatched
/// row never reaches the classifier.
pub fn classify(model: &dyn RatingClassifier, row: &[f64]) -> Result<usize, RequestError> {
    let expected = model.n_features();
    if row.len() != expected {
        return Err(RequestError::FeatureShape { expected, actual: row.len() });
    }
    Ok(model.predict_code(row))
}

pub fn decode_rating(rating: &LabelEncoder, code: usize) -> Result<String, RequestError> {
    rating
        .decode(code)
        .map(str::to_string)
        .ok_or(RequestError::ClassOutOfRange { code, known: rating.len() })
}
