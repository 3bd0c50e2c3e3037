// ============================================================
// Layer 1 — Route Handlers
// ============================================================
// Thin: each handler unpacks the request, calls the predict use
// case or the chart renderer, and maps failures onto ApiError.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};

use crate::api::{state::AppState, ApiError, Result};
use crate::application::predict_use_case::{PredictError, PredictionResponse};
use crate::domain::patient::NORMAL_VALUES;
use crate::infra::chart::{render_comparison, COMPARISON_FILE};

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": state.predictor.welcome_message() }))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "Healthy" }))
}

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let Json(body) = payload.map_err(|rejection| ApiError::Malformed {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;

    match state.predictor.predict_json(&body) {
        Ok(response)                        => Ok(Json(response)),
        Err(PredictError::Invalid(v))       => Err(ApiError::Validation(v)),
        Err(e @ PredictError::Inference(_)) => Err(ApiError::Internal(e.to_string())),
    }
}

/// GET /comparison
///
/// Draws the fixed baseline values, not the caller's own.
pub async fn comparison(State(state): State<AppState>) -> Result<Html<String>> {
    let dir = state.static_dir.clone();
    tokio::task::spawn_blocking(move || render_comparison(&dir, &NORMAL_VALUES))
        .await
        .map_err(|e| ApiError::Internal(format!("chart task panicked: {e}")))?
        .map_err(|e| ApiError::Internal(format!("{e:#}")))?;

    Ok(Html(format!("<img src='/static/{COMPARISON_FILE}'>")))
}
