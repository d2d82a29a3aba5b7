// ============================================================
// Layer 3 — Feature Vector
// ============================================================
// The classifier sees a flat row of seven numbers. Their ORDER is
// part of the model's contract: the forest only checks how many
// features it receives, never what they mean, so a reordered row
// still predicts, just wrongly.
//
// Column order (index → meaning):
//   0  issuer code            (IssuerEncoder)
//   1  industry code          (IndustryEncoder)
//   2  debt to equity
//   3  EBITDA margin (%)
//   4  interest coverage
//   5  issue size (₹ crores)
//   6  default history flag   (0 / 1)
//
// Training and inference both build rows through
// FeatureVector::assemble, so there is exactly one place where
// the order is written down.

use serde::{Deserialize, Serialize};

/// Width of every row passed to the classifier
pub const FEATURE_COUNT: usize = 7;

/// Column names in row order, as they appear in the training dataset
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Issuer Encoded",
    "Industry Encoded",
    "Debt to Equity",
    "EBITDA Margin",
    "Interest Coverage",
    "Issue Size (₹Cr)",
    "DefaultFlag",
];

/// The numeric inputs of a record, shared by training rows and requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub debt_to_equity:    f64,
    /// Percentage, may be negative
    pub ebitda_margin:     f64,
    pub interest_coverage: f64,
    /// Currency units (₹ crores)
    pub issue_size:        f64,
    pub default_flag:      bool,
}

/// One row of classifier input in the fixed column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub issuer_code:       f64,
    pub industry_code:     f64,
    pub debt_to_equity:    f64,
    pub ebitda_margin:     f64,
    pub interest_coverage: f64,
    pub issue_size:        f64,
    pub default_flag:      f64,
}

impl FeatureVector {
    /// Build a vector from encoded categories and raw financials.
    pub fn assemble(issuer_code: f64, industry_code: f64, f: &Financials) -> Self {
        Self {
            issuer_code,
            industry_code,
            debt_to_equity:    f.debt_to_equity,
            ebitda_margin:     f.ebitda_margin,
            interest_coverage: f.interest_coverage,
            issue_size:        f.issue_size,
            default_flag:      if f.default_flag { 1.0 } else { 0.0 },
        }
    }

    /// Flatten into the row layout documented at the top of this file.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.issuer_code,
            self.industry_code,
            self.debt_to_equity,
            self.ebitda_margin,
            self.interest_coverage,
            self.issue_size,
            self.default_flag,
        ]
    }
}
