//! Machine Failure Classifier - Training Entry Point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use trainer::{init_logging, run, TrainingConfig};

#[derive(Parser)]
#[command(name = "train", about = "Train and persist the machine failure classifier")]
struct Cli {
    /// TOML config file (optional; TRAINER_* environment variables also apply)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV path
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Holdout split seed
    #[arg(long)]
    seed: Option<u64>,

    /// Holdout fraction
    #[arg(long)]
    test_size: Option<f64>,

    /// Gradient descent iteration cap
    #[arg(long)]
    max_iter: Option<usize>,

    /// Write dataset summary charts to this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = TrainingConfig::load(cli.config.as_deref()).context("loading training config")?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(test_size) = cli.test_size {
        config.test_size = test_size;
    }
    if let Some(max_iter) = cli.max_iter {
        config.max_iter = max_iter;
    }
    if cli.report_dir.is_some() {
        config.report_dir = cli.report_dir;
    }

    init_logging(&config.log_level)?;
    info!("=== Machine Failure Trainer v{} ===", env!("CARGO_PKG_VERSION"));

    let report = run(&config).context("training run failed")?;
    println!("{}", report);

    Ok(())
}
