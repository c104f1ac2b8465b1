//! API Error Responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;

/// Errors returned from request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Inference(InferenceError::Feature(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
