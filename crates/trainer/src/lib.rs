//! Training Driver
//!
//! One linear batch run: load the CSV, build features, split 80/20 with a
//! fixed seed, fit the pipeline, evaluate on the holdout and persist the
//! artifact. Any failure aborts the whole run.

mod settings;
mod dataset;
mod driver;

pub use settings::TrainingConfig;
pub use dataset::{extract_labels, holdout_split, load_records, HoldoutSplit};
pub use driver::{render_reports, run, TrainingReport};

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Errors that abort a training run
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to read dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Dataset {0} contains no records")]
    EmptyDataset(PathBuf),
    #[error("Record {row} has no `Machine failure` label")]
    MissingLabel { row: usize },
    #[error("Feature construction failed: {0}")]
    Feature(#[from] feature_engine::FeatureError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] inference_engine::InferenceError),
    #[error("Report rendering failed: {0}")]
    Report(#[from] reporting::ReportError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging at the given level name (falls back to INFO)
pub fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
