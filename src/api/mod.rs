// ============================================================
// Layer 1 — HTTP Prediction Service
// ============================================================
// The second entry point next to the CLI. Serves one loaded
// model over a small JSON API:
//
//   GET  /            both   {"message": <welcome>}
//   GET  /health      both   {"status": "Healthy"}
//   POST /predict     both   {"predicted_risk"} | {"predicted_purchase_amount"}
//   GET  /comparison  risk   <img> tag pointing at the rendered chart
//   GET  /static/*    both   files under the static directory
//
//   handlers.rs — one async fn per route
//   routes.rs   — PredictionServer: router, layers, serve loop
//   state.rs    — AppState shared by every handler
//
// Reference: axum documentation

pub mod handlers;
pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::schema::FieldViolation;

pub use routes::PredictionServer;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host:          String,
    pub port:          u16,
    pub artifact_path: PathBuf,
    pub static_dir:    PathBuf,
    pub cors_enabled:  bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host:          "0.0.0.0".to_string(),
            port:          8000,
            artifact_path: PathBuf::from("rf_model_tuned5.json"),
            static_dir:    PathBuf::from("static"),
            cors_enabled:  false,
        }
    }
}

impl ServeConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed validation")]
    Validation(Vec<FieldViolation>),

    /// The body could not be read as JSON at all
    #[error("malformed request: {detail}")]
    Malformed { status: StatusCode, detail: String },

    /// Internal fault; the message is logged, never returned
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation_failed", "detail": detail })),
            )
                .into_response(),
            ApiError::Malformed { status, detail } => (
                status,
                Json(json!({ "error": "malformed_request", "detail": detail })),
            )
                .into_response(),
            ApiError::Internal(cause) => {
                tracing::error!("Request failed: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal_error", "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
