//! Machine Failure Prediction API
//!
//! Serves single-record failure predictions from a pipeline loaded once at
//! startup and shared read-only across requests.

use axum::{
    routing::{get, post},
    Router,
};
use inference_engine::InferenceEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;
mod settings;

pub use error::ApiError;
pub use routes::health::{HealthResponse, ModelInfo};
pub use routes::predict::PredictResponse;
pub use settings::ServiceConfig;

/// Application state shared across handlers
pub struct AppState {
    /// Loaded pipeline, never reloaded
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state around a loaded engine
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/health", get(routes::health::health))
        .route("/metrics", get(routes::health::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
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

/// Load the artifact and serve until Ctrl-C
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let engine = InferenceEngine::load(&config.model_path)?;

    let mut state = AppState::new(engine);
    if config.enable_metrics {
        let handle = PrometheusBuilder::new().install_recorder()?;
        state = state.with_metrics(handle);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use feature_engine::MachineRecord;
    use inference_engine::{FittedPipeline, InferenceEngine, PipelineConfig};
    use ndarray::Array1;
    use serde_json::{json, Value};

    fn record(i: usize) -> MachineRecord {
        let machine_type = ["L", "M", "H"][i % 3];
        let torque = 20.0 + (i % 50) as f64;
        let failed = u8::from(torque >= 62.0);
        MachineRecord {
            udi: Some(i as u64 + 1),
            product_id: Some(format!("{}{}", machine_type, 14_800 + i)),
            machine_type: machine_type.to_string(),
            air_temperature: 298.0 + (i % 7) as f64 * 0.3,
            process_temperature: 308.0 + (i % 5) as f64 * 0.4,
            rotational_speed: 1400.0 + (i % 11) as f64 * 25.0,
            torque,
            tool_wear: (i % 200) as f64,
            machine_failure: Some(failed),
            twf: 0,
            hdf: 0,
            pwf: 0,
            osf: failed,
            rnf: 0,
        }
    }

    pub(crate) fn engine() -> InferenceEngine {
        let records: Vec<MachineRecord> = (0..300).map(record).collect();
        let labels: Array1<u8> = records.iter().map(|r| r.machine_failure.unwrap_or(0)).collect();
        let pipeline = FittedPipeline::fit(&records, labels.view(), PipelineConfig::default())
            .expect("fit test pipeline");
        InferenceEngine::from_pipeline(pipeline)
    }

    /// The example payload sent by the demo client
    pub(crate) fn reference_payload() -> Value {
        json!({
            "UDI": 90,
            "Product ID": "M14949",
            "Type": "M",
            "Air temperature [K]": 298.9,
            "Process temperature [K]": 308.9,
            "Rotational speed [rpm]": 1487,
            "Torque [Nm]": 39.5,
            "Tool wear [min]": 30,
            "Machine failure": 0,
            "TWF": 0,
            "HDF": 0,
            "PWF": 0,
            "OSF": 0,
            "RNF": 0
        })
    }
}
