//! Shared test data: two issuers, two industries, and a rating that
//! depends only on the industry (Banking → AAA, Retail → BB). The
//! financial columns are constant, so every tree has to split on
//! the industry column to become pure.

use std::path::Path;

use crate::data::dataset::{encode_records, to_matrix, TrainingEncoders};
use crate::domain::features::Financials;
use crate::domain::record::{CreditRecord, RatingRequest};
use crate::infra::artifacts::Artifacts;
use crate::ml::forest::{ForestConfig, RandomForest};

pub const ROWS_PER_COMBINATION: usize = 40;

pub fn financials() -> Financials {
    Financials {
        debt_to_equity:    1.5,
        ebitda_margin:     10.0,
        interest_coverage: 3.0,
        issue_size:        100.0,
        default_flag:      false,
    }
}

pub fn records() -> Vec<CreditRecord> {
    let combos = [
        ("Acme Co",  "Banking", "AAA"),
        ("Acme Co",  "Retail",  "BB"),
        ("Beta Ltd", "Banking", "AAA"),
        ("Beta Ltd", "Retail",  "BB"),
    ];
    let f = financials();
    (0..ROWS_PER_COMBINATION)
        .flat_map(|_| combos.iter())
        .map(|&(issuer, industry, rating)| CreditRecord {
            issuer_name:       issuer.into(),
            industry:          industry.into(),
            debt_to_equity:    f.debt_to_equity,
            ebitda_margin:     f.ebitda_margin,
            interest_coverage: f.interest_coverage,
            issue_size:        f.issue_size,
            default_flag:      f.default_flag,
            final_rating:      rating.into(),
        })
        .collect()
}

pub fn artifacts() -> Artifacts {
    let records  = records();
    let encoders = TrainingEncoders::fit(&records);
    let samples  = encode_records(&records, &encoders).expect("fixture encodes");
    let (rows, labels) = to_matrix(&samples);
    let cfg   = ForestConfig { n_estimators: 25, ..ForestConfig::default() };
    let model = RandomForest::fit(&rows, &labels, encoders.rating.len(), &cfg).expect("fixture fits");

    Artifacts {
        issuer:   encoders.issuer,
        industry: encoders.industry,
        rating:   encoders.rating,
        model,
    }
}

/// issuer="Acme Co", industry="Retail", D/E 1.5, margin 10, cover 3, size 100, no default
pub fn acme_retail() -> RatingRequest {
    RatingRequest::new("Acme Co", "Retail", financials())
}

/// Write `records()` as a dataset CSV.
pub fn write_dataset(path: &Path) {
    let mut w = csv::Writer::from_path(path).expect("create dataset");
    for r in records() {
        w.serialize(r).expect("write row");
    }
    w.flush().expect("flush dataset");
}
