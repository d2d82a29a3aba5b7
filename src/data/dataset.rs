use anyhow::{anyhow, Result};

use crate::domain::features::FeatureVector;
use crate::domain::record::CreditRecord;
use crate::ml::encoder::LabelEncoder;

/// The three label encoders fitted on a training dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEncoders {
    pub issuer:   LabelEncoder,
    pub industry: LabelEncoder,
    pub rating:   LabelEncoder,
}

impl TrainingEncoders {
    /// Fit each encoder over the full column, before any split.
    pub fn fit(records: &[CreditRecord]) -> Self {
        Self {
            issuer:   LabelEncoder::fit(records.iter().map(|r| r.issuer_name.as_str())),
            industry: LabelEncoder::fit(records.iter().map(|r| r.industry.as_str())),
            rating:   LabelEncoder::fit(records.iter().map(|r| r.final_rating.as_str())),
        }
    }
}

/// One encoded training sample: the classifier input and its rating code.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSample {
    pub features: FeatureVector,
    pub label:    usize,
}

/// Encode every record with `encoders`. Fails on a label the
/// encoders were not fitted on.
pub fn encode_records(records: &[CreditRecord], encoders: &TrainingEncoders) -> Result<Vec<EncodedSample>> {
    records
        .iter()
        .map(|r| {
            let issuer = encoders.issuer.encode(&r.issuer_name)
                .ok_or_else(|| anyhow!("Issuer '{}' missing from the issuer encoder", r.issuer_name))?;
            let industry = encoders.industry.encode(&r.industry)
                .ok_or_else(|| anyhow!("Industry '{}' missing from the industry encoder", r.industry))?;
            let label = encoders.rating.encode(&r.final_rating)
                .ok_or_else(|| anyhow!("Rating '{}' missing from the rating encoder", r.final_rating))?;

            Ok(EncodedSample {
                features: FeatureVector::assemble(issuer as f64, industry as f64, &r.financials()),
                label,
            })
        })
        .collect()
}

/// Split samples into the (rows, labels) pair the forest fits on.
pub fn to_matrix(samples: &[EncodedSample]) -> (Vec<Vec<f64>>, Vec<usize>) {
    samples
        .iter()
        .map(|s| (s.features.to_row().to_vec(), s.label))
        .unzip()
}
