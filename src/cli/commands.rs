// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Subcommands:
//   train        fit encoders + forest from a labelled CSV
//   predict      rate one issuer and log the prediction
//   history      show past predictions
//   inspect      show what the artifacts contain
//   migrate-log  rewrite a legacy log into the current columns

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::predict_use_case::ServiceConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::features::Financials;
use crate::domain::record::{InputLimits, RatingRequest};
use crate::ml::inferencer::UnknownIssuerPolicy;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the rating classifier on a labelled dataset
    Train(TrainArgs),

    /// Predict the credit rating of one issuer
    Predict(PredictArgs),

    /// Show previous predictions
    History(HistoryArgs),

    /// List the issuers, industries and ratings the model knows
    Inspect(InspectArgs),

    /// Rewrite a legacy prediction log into the current column layout
    MigrateLog(MigrateLogArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled dataset (CSV with a Final Rating column)
    #[arg(long, default_value = "Simulated_CreditRating_Data.csv")]
    pub dataset: String,

    /// Where the encoders and model are written
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Maximum tree depth; unlimited when omitted
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Smallest node that may still be split
    #[arg(long, default_value_t = 2)]
    pub min_samples_split: usize,

    /// Features tried per split; floor(sqrt(7)) when omitted
    #[arg(long)]
    pub max_features: Option<usize>,

    /// Fraction of rows held out for scoring
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the split, bootstrap and feature sampling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:      a.dataset,
            artifact_dir:      a.artifact_dir,
            n_estimators:      a.n_estimators,
            max_depth:         a.max_depth,
            min_samples_split: a.min_samples_split,
            max_features:      a.max_features,
            test_fraction:     a.test_fraction,
            seed:              a.seed,
        }
    }
}

/// How `predict` treats an issuer missing from the training data
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownIssuerArg {
    /// Refuse the request
    Reject,
    /// Predict with a reserved "unknown issuer" code
    Sentinel,
}

impl From<UnknownIssuerArg> for UnknownIssuerPolicy {
    fn from(a: UnknownIssuerArg) -> Self {
        match a {
            UnknownIssuerArg::Reject   => UnknownIssuerPolicy::Reject,
            UnknownIssuerArg::Sentinel => UnknownIssuerPolicy::Sentinel,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long)]
    pub issuer: String,

    #[arg(long)]
    pub industry: String,

    #[arg(long, default_value_t = 1.5)]
    pub debt_to_equity: f64,

    /// Percent; may be negative
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub ebitda_margin: f64,

    #[arg(long, default_value_t = 3.0)]
    pub interest_coverage: f64,

    /// ₹ crores
    #[arg(long, default_value_t = 100.0)]
    pub issue_size: f64,

    /// Has the issuer defaulted before?
    #[arg(long, value_enum, default_value_t = YesNo::No)]
    pub default_flag: YesNo,

    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: PathBuf,

    /// Prediction history CSV
    #[arg(long, default_value = "prediction_history.csv")]
    pub log: PathBuf,

    #[arg(long, value_enum, default_value_t = UnknownIssuerArg::Reject)]
    pub unknown_issuer: UnknownIssuerArg,
}

impl PredictArgs {
    pub fn request(&self) -> RatingRequest {
        RatingRequest::new(
            self.issuer.clone(),
            self.industry.clone(),
            Financials {
                debt_to_equity:    self.debt_to_equity,
                ebitda_margin:     self.ebitda_margin,
                interest_coverage: self.interest_coverage,
                issue_size:        self.issue_size,
                default_flag:      self.default_flag == YesNo::Yes,
            },
        )
    }
}

impl From<&PredictArgs> for ServiceConfig {
    fn from(a: &PredictArgs) -> Self {
        ServiceConfig {
            artifact_dir:   a.artifact_dir.clone(),
            log_path:       a.log.clone(),
            unknown_issuer: a.unknown_issuer.into(),
            limits:         InputLimits::default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(long, default_value = "prediction_history.csv")]
    pub log: PathBuf,

    /// Show only the most recent N predictions
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct MigrateLogArgs {
    #[arg(long, default_value = "prediction_history.csv")]
    pub log: PathBuf,
}
