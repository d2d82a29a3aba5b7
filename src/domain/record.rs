// ============================================================
// Layer 3 — Records
// ============================================================
// The three shapes a credit record takes on its way through the
// system:
//
//   CreditRecord       — one labelled row of the training dataset
//   RatingRequest      — one user-entered record awaiting a rating
//   PredictionLogEntry — the request plus its decoded rating, as
//                        one row of the prediction log
//
// CSV column names are bound with #[serde(rename)] so the csv
// crate maps headers to fields by name.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::RequestError;
use crate::domain::features::Financials;

// ─── CreditRecord ─────────────────────────────────────────────────────────────
/// A labelled historical record from the training dataset.
/// Extra dataset columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    #[serde(rename = "Issuer Name")]
    pub issuer_name: String,

    #[serde(rename = "Industry")]
    pub industry: String,

    #[serde(rename = "Debt to Equity")]
    pub debt_to_equity: f64,

    #[serde(rename = "EBITDA Margin")]
    pub ebitda_margin: f64,

    #[serde(rename = "Interest Coverage")]
    pub interest_coverage: f64,

    #[serde(rename = "Issue Size (₹Cr)")]
    pub issue_size: f64,

    /// Stored as Yes/No in the dataset
    #[serde(
        rename = "DefaultFlag",
        deserialize_with = "deserialize_default_flag",
        serialize_with = "serialize_default_flag"
    )]
    pub default_flag: bool,

    #[serde(rename = "Final Rating")]
    pub final_rating: String,
}

impl CreditRecord {
    pub fn financials(&self) -> Financials {
        Financials {
            debt_to_equity:    self.debt_to_equity,
            ebitda_margin:     self.ebitda_margin,
            interest_coverage: self.interest_coverage,
            issue_size:        self.issue_size,
            default_flag:      self.default_flag,
        }
    }
}

/// Parse a default-history flag: Yes/No, 1/0 or true/false, any case.
pub fn parse_default_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "1" | "true"  => Some(true),
        "no"  | "n" | "0" | "false" => Some(false),
        _ => None,
    }
}

fn deserialize_default_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    parse_default_flag(&raw).ok_or_else(|| {
        de::Error::custom(format!("DefaultFlag must be Yes/No or 1/0, got '{raw}'"))
    })
}

fn serialize_default_flag<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *flag { "Yes" } else { "No" })
}

// ─── InputLimits ──────────────────────────────────────────────────────────────
/// Accepted range for every numeric input, bounds inclusive.
/// Defaults are the bounds the data-entry form enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub debt_to_equity:    (f64, f64),
    pub ebitda_margin:     (f64, f64),
    pub interest_coverage: (f64, f64),
    pub issue_size:        (f64, f64),
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            debt_to_equity:    (0.0, 10.0),
            ebitda_margin:     (-100.0, 100.0),
            interest_coverage: (0.0, 20.0),
            issue_size:        (1.0, 10_000.0),
        }
    }
}

// ─── RatingRequest ────────────────────────────────────────────────────────────
/// A raw user-entered record. Nothing here has been checked yet;
/// call `validate` before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRequest {
    pub issuer_name: String,
    pub industry:    String,
    pub financials:  Financials,
}

impl RatingRequest {
    pub fn new(
        issuer_name: impl Into<String>,
        industry:    impl Into<String>,
        financials:  Financials,
    ) -> Self {
        Self {
            issuer_name: issuer_name.into(),
            industry:    industry.into(),
            financials,
        }
    }

    /// Check every field against `limits`.
    /// Category membership is checked later, against the encoders.
    pub fn validate(&self, limits: &InputLimits) -> Result<(), RequestError> {
        if self.issuer_name.trim().is_empty() {
            return Err(invalid("issuer name", "an issuer must be selected"));
        }
        if self.industry.trim().is_empty() {
            return Err(invalid("industry", "an industry must be selected"));
        }

        let f = &self.financials;
        check_range("debt to equity",    f.debt_to_equity,    limits.debt_to_equity)?;
        check_range("EBITDA margin",     f.ebitda_margin,     limits.ebitda_margin)?;
        check_range("interest coverage", f.interest_coverage, limits.interest_coverage)?;
        check_range("issue size",        f.issue_size,        limits.issue_size)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> RequestError {
    RequestError::InvalidInput { field, reason: reason.into() }
}

fn check_range(field: &'static str, value: f64, (lo, hi): (f64, f64)) -> Result<(), RequestError> {
    if !value.is_finite() {
        return Err(invalid(field, format!("{value} is not a finite number")));
    }
    if value < lo || value > hi {
        return Err(invalid(field, format!("{value} is outside [{lo}, {hi}]")));
    }
    Ok(())
}

// ─── PredictionLogEntry ───────────────────────────────────────────────────────
/// Canonical prediction-log header, in column order.
pub const LOG_HEADER: [&str; 8] = [
    "Issuer Name",
    "Industry",
    "Debt to Equity",
    "EBITDA Margin",
    "Interest Coverage",
    "Issue Size (₹Cr)",
    "DefaultFlag",
    "Predicted Rating",
];

/// One denormalized row of the prediction log.
/// Field order matches LOG_HEADER.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    #[serde(rename = "Issuer Name")]
    pub issuer_name: String,

    #[serde(rename = "Industry")]
    pub industry: String,

    #[serde(rename = "Debt to Equity")]
    pub debt_to_equity: f64,

    #[serde(rename = "EBITDA Margin")]
    pub ebitda_margin: f64,

    #[serde(rename = "Interest Coverage")]
    pub interest_coverage: f64,

    #[serde(rename = "Issue Size (₹Cr)")]
    pub issue_size: f64,

    /// 0 or 1. Empty only for rows migrated from logs that never
    /// recorded the flag.
    #[serde(rename = "DefaultFlag")]
    pub default_flag: Option<u8>,

    #[serde(rename = "Predicted Rating")]
    pub predicted_rating: String,
}

impl PredictionLogEntry {
    pub fn new(request: &RatingRequest, predicted_rating: impl Into<String>) -> Self {
        let f = &request.financials;
        Self {
            issuer_name:       request.issuer_name.clone(),
            industry:          request.industry.clone(),
            debt_to_equity:    f.debt_to_equity,
            ebitda_margin:     f.ebitda_margin,
            interest_coverage: f.interest_coverage,
            issue_size:        f.issue_size,
            default_flag:      Some(u8::from(f.default_flag)),
            predicted_rating:  predicted_rating.into(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RatingRequest {
        RatingRequest::new(
            "Acme Co",
            "Retail",
            Financials {
                debt_to_equity:    1.5,
                ebitda_margin:     10.0,
                interest_coverage: 3.0,
                issue_size:        100.0,
                default_flag:      false,
            },
        )
    }

    #[test]
    fn test_parse_default_flag_variants() {
        assert_eq!(parse_default_flag("Yes"), Some(true));
        assert_eq!(parse_default_flag(" no "), Some(false));
        assert_eq!(parse_default_flag("1"), Some(true));
        assert_eq!(parse_default_flag("FALSE"), Some(false));
        assert_eq!(parse_default_flag("maybe"), None);
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate(&InputLimits::default()).is_ok());
    }

    #[test]
    fn test_blank_issuer_is_invalid_input() {
        let mut r = request();
        r.issuer_name = "  ".into();
        let err = r.validate(&InputLimits::default()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidInput { field: "issuer name", .. }));
    }

    #[test]
    fn test_negative_debt_to_equity_rejected() {
        let mut r = request();
        r.financials.debt_to_equity = -0.1;
        assert!(r.validate(&InputLimits::default()).is_err());
    }

    #[test]
    fn test_negative_ebitda_margin_allowed() {
        let mut r = request();
        r.financials.ebitda_margin = -25.0;
        assert!(r.validate(&InputLimits::default()).is_ok());
    }

    #[test]
    fn test_nan_rejected() {
        let mut r = request();
        r.financials.interest_coverage = f64::NAN;
        let err = r.validate(&InputLimits::default()).unwrap_err();
        assert!(err.is_bad_input());
    }

    #[test]
    fn test_zero_issue_size_rejected() {
        let mut r = request();
        r.financials.issue_size = 0.0;
        assert!(r.validate(&InputLimits::default()).is_err());
    }

    #[test]
    fn test_log_entry_copies_request() {
        let e = PredictionLogEntry::new(&request(), "AA");
        assert_eq!(e.issuer_name, "Acme Co");
        assert_eq!(e.default_flag, Some(0));
        assert_eq!(e.predicted_rating, "AA");
    }
}
