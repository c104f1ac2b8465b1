//! Health and Metrics Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelInfo,
}

/// Summary of the loaded pipeline
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub path: Option<String>,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub feature_count: usize,
    /// Holdout accuracy recorded at training time
    pub holdout_accuracy: Option<f64>,
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let metadata = state.engine.pipeline().metadata();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelInfo {
            path: state
                .engine
                .model_path()
                .map(|p| p.display().to_string()),
            trained_at: metadata.trained_at,
            training_rows: metadata.training_rows,
            feature_count: metadata.feature_names.len(),
            holdout_accuracy: metadata.evaluation.as_ref().map(|r| r.accuracy),
        },
    })
}

/// `GET /metrics` in Prometheus text format
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
