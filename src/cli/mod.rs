// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. Everything else
// is delegated to Layer 2 (application).
//
// Commands:
//   1. `train`       — fit encoders + forest, save artifacts
//   2. `predict`     — rate one issuer, append to the history log
//   3. `history`     — list logged predictions
//   4. `inspect`     — describe the saved artifacts
//   5. `migrate-log` — upgrade a legacy history log

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, HistoryArgs, InspectArgs, MigrateLogArgs, PredictArgs, TrainArgs};

use crate::domain::error::RequestError;

#[derive(Parser, Debug)]
#[command(
    name = "credit-rating",
    version = "0.1.0",
    about = "Train a random-forest credit rating classifier and rate bond issuers with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)      => run_train(args),
            Commands::Predict(args)    => run_predict(args),
            Commands::History(args)    => run_history(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::MigrateLog(args) => run_migrate_log(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on dataset: {}", args.dataset);
    let artifact_dir = args.artifact_dir.clone();

    let metrics = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete. Artifacts saved to '{artifact_dir}'.");
    println!("  trees            : {}", metrics.n_trees);
    println!("  train rows       : {}", metrics.n_train);
    println!("  hold-out rows    : {}", metrics.n_holdout);
    println!("  train accuracy   : {:.3}", metrics.train_accuracy);
    println!("  hold-out accuracy: {:.3}", metrics.holdout_accuracy);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::{RatingService, ServiceConfig};

    let request = args.request();
    let service = RatingService::open(ServiceConfig::from(&args))
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    let outcome = service.predict(&request).map_err(request_failure)?;

    tracing::debug!(
        "Encoded features {:?} -> rating code {}",
        outcome.prediction.features.to_row(),
        outcome.prediction.rating_code,
    );

    let f = &request.financials;
    println!("\nInput summary");
    println!("  Issuer Name       : {}", request.issuer_name);
    println!("  Industry          : {}", request.industry);
    println!("  Debt to Equity    : {}", f.debt_to_equity);
    println!("  EBITDA Margin     : {}", f.ebitda_margin);
    println!("  Interest Coverage : {}", f.interest_coverage);
    println!("  Issue Size (₹Cr)  : {}", f.issue_size);
    println!("  DefaultFlag       : {}", if f.default_flag { "Yes" } else { "No" });

    if !outcome.prediction.issuer_known {
        println!("\nNote: '{}' was not in the training data.", request.issuer_name);
    }
    println!("\nPredicted Credit Rating: {}", outcome.prediction.rating);

    // The rating stands even when the history row could not be written
    if let Err(e) = outcome.logged {
        eprintln!("Warning: prediction was not saved to history: {e}");
    }
    Ok(())
}

/// Tags a failed request with who has to fix it: the caller or the artifacts.
fn request_failure(e: RequestError) -> anyhow::Error {
    if e.is_bad_input() {
        anyhow::anyhow!("invalid input: {e}")
    } else {
        anyhow::anyhow!("configuration error: {e}")
    }
}

fn run_history(args: HistoryArgs) -> Result<()> {
    use crate::application::history_use_case::HistoryUseCase;
    use crate::infra::prediction_log::PredictionLog;

    if !args.log.exists() {
        println!("No predictions logged yet.");
        return Ok(());
    }

    let rows = HistoryUseCase::new(PredictionLog::new(&args.log)).recent(args.limit)?;
    if rows.is_empty() {
        println!("No predictions logged yet.");
        return Ok(());
    }

    println!(
        "{:<24} {:<16} {:>8} {:>8} {:>8} {:>10} {:>7}  {}",
        "Issuer", "Industry", "D/E", "EBITDA%", "Cover", "Size(₹Cr)", "Default", "Rating"
    );
    for r in rows {
        let flag = match r.default_flag {
            Some(1) => "Yes",
            Some(_) => "No",
            None    => "-",
        };
        println!(
            "{:<24} {:<16} {:>8.2} {:>8.2} {:>8.2} {:>10.1} {:>7}  {}",
            r.issuer_name,
            r.industry,
            r.debt_to_equity,
            r.ebitda_margin,
            r.interest_coverage,
            r.issue_size,
            flag,
            r.predicted_rating,
        );
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;
    use crate::domain::features::{FEATURE_COLUMNS, FEATURE_COUNT};
    use crate::infra::artifacts::ArtifactStore;

    let s = InspectUseCase::new(ArtifactStore::new(&args.artifact_dir)).summary()?;

    println!("Artifacts in '{}'", args.artifact_dir.display());
    println!("  issuers    ({}): {}", s.issuers.len(), s.issuers.join(", "));
    println!("  industries ({}): {}", s.industries.len(), s.industries.join(", "));
    println!("  ratings    ({}): {}", s.ratings.len(), s.ratings.join(", "));
    println!("  model      : {} trees, {} features, {} classes", s.n_trees, s.n_features, s.n_classes);
    if s.n_features == FEATURE_COUNT {
        println!("  inputs     : {}", FEATURE_COLUMNS.join(", "));
    }

    match &s.config {
        Some(cfg) => println!("  trained on : {} (seed {}, test fraction {})", cfg.dataset_path, cfg.seed, cfg.test_fraction),
        None      => println!("  trained on : unknown"),
    }
    if let Some(m) = &s.metrics {
        println!(
            "  accuracy   : train {:.3}, hold-out {:.3}",
            m.train_accuracy, m.holdout_accuracy
        );
    }
    Ok(())
}

fn run_migrate_log(args: MigrateLogArgs) -> Result<()> {
    use crate::application::history_use_case::HistoryUseCase;
    use crate::infra::prediction_log::PredictionLog;

    let report = HistoryUseCase::new(PredictionLog::new(&args.log)).migrate()?;

    match &report.backup {
        None => println!("'{}' already uses the current layout.", args.log.display()),
        Some(backup) => {
            println!("Migrated {} rows in '{}'.", report.rows, args.log.display());
            if !report.filled_columns.is_empty() {
                println!("  columns added as empty: {}", report.filled_columns.join(", "));
            }
            println!("  original kept at      : {}", backup.display());
        }
    }
    Ok(())
}
