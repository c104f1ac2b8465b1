//! Prediction Route

use axum::{extract::State, Json};
use feature_engine::MachineRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{ApiError, AppState};

/// Body of a successful prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// 1 when a failure is predicted, otherwise 0
    pub prediction: u8,
}

/// `POST /predict`
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<MachineRecord>,
) -> Result<Json<PredictResponse>, ApiError> {
    let result = match state.engine.predict(&record) {
        Ok(result) => result,
        Err(e) => {
            metrics::counter!("prediction_errors_total").increment(1);
            warn!("Prediction rejected: {}", e);
            return Err(e.into());
        }
    };

    let outcome = if result.prediction.failure { "failure" } else { "normal" };
    metrics::counter!("predictions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("prediction_latency_seconds").record(result.latency_us as f64 / 1e6);

    debug!(
        probability = result.prediction.probability,
        latency_us = result.latency_us,
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prediction: result.prediction.label(),
    }))
}
