//! Machine Failure Prediction Service - Main Entry Point

use api::{init_logging, run_server, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "failure-api", about = "Serve machine failure predictions over HTTP")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the pipeline artifact path
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    init_logging(&config.log_level)?;

    info!("=== Machine Failure Prediction API v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Loading pipeline from {}", config.model_path.display());

    run_server(config).await
}
