// ============================================================
// Layer 1 — Prediction Server
// ============================================================
// Loads the artifact, builds the router and serves it:
//
//   PredictionServer::new   → artifact loaded and checked
//                             (any failure stops startup)
//   PredictionServer::run   → bind, serve, stop on Ctrl-C
//
// Layers: TraceLayer on every request, CorsLayer when enabled.

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{
    handlers::{comparison, health_check, predict, root},
    state::AppState,
    ServeConfig,
};
use crate::application::predict_use_case::PredictUseCase;
use crate::infra::artifact::ArtifactStore;
use crate::ml::inferencer::ServiceVariant;

/// Prediction server around one loaded model
pub struct PredictionServer {
    config: ServeConfig,
    state:  AppState,
}

impl PredictionServer {
    /// Load the artifact and build the server. Fails if the model
    /// cannot be loaded, before anything is bound.
    pub fn new(config: ServeConfig) -> Result<Self> {
        let predictor = PredictUseCase::from_artifact(&ArtifactStore::new(&config.artifact_path))
            .context("Cannot start prediction service")?;
        Ok(Self::with_predictor(config, predictor))
    }

    pub fn with_predictor(config: ServeConfig, predictor: PredictUseCase) -> Self {
        let state = AppState::new(predictor, config.static_dir.clone());
        Self { config, state }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let mut app = Router::new()
            .route("/", get(root))
            .route("/health", get(health_check))
            .route("/predict", post(predict));

        // Only the risk model has a baseline chart
        if self.state.predictor.variant() == ServiceVariant::Risk {
            app = app.route("/comparison", get(comparison));
        }

        let mut app = app
            .nest_service("/static", ServeDir::new(self.config.static_dir.as_path()))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let addr     = self.config.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Cannot bind to {addr}"))?;

        tracing::info!("Prediction service listening on http://{addr}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("Prediction service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::path::Path;
    use tower::ServiceExt;

    use crate::data::dataset::Dataset;
    use crate::domain::patient::RISK_FEATURES;
    use crate::domain::purchase::PURCHASE_FEATURES;
    use crate::infra::artifact::ModelArtifact;
    use crate::ml::forest::{ForestParams, MaxFeatures, RandomForestClassifier, RandomForestRegressor};
    use crate::ml::inferencer::Inferencer;

    fn risk_artifact() -> ModelArtifact {
        let names   = RISK_FEATURES.iter().map(|s| s.to_string()).collect();
        let records = (0..16)
            .map(|i| {
                let mut row = vec![0.0; 10];
                row[0] = (i % 2) as f64;
                row[6] = 60.0 + i as f64;
                row
            })
            .collect();
        let targets = (0..16).map(|i| i % 2).collect();
        let ds      = Dataset::new(names, records, targets).unwrap();
        let params  = ForestParams {
            n_estimators: 5,
            max_features: MaxFeatures::All,
            seed:         123,
            ..ForestParams::default()
        };
        ModelArtifact::RiskClassifier(
            RandomForestClassifier::fit(&ds, vec!["0".into(), "1".into()], params).unwrap(),
        )
    }

    fn purchase_artifact() -> ModelArtifact {
        let names = PURCHASE_FEATURES.iter().map(|s| s.to_string()).collect();
        let ds    = Dataset::new(
            names,
            vec![vec![25.0, 1.0], vec![35.0, 0.0], vec![45.0, 1.0], vec![55.0, 0.0]],
            vec![120.0, 180.0, 260.0, 300.0],
        )
        .unwrap();
        let params = ForestParams { n_estimators: 5, seed: 123, ..ForestParams::default() };
        ModelArtifact::PurchaseRegressor(RandomForestRegressor::fit(&ds, params).unwrap())
    }

    fn server_for(artifact: ModelArtifact, dir: &Path) -> PredictionServer {
        let artifact_path = dir.join("model.json");
        ArtifactStore::new(&artifact_path).save(&artifact).unwrap();
        PredictionServer::new(ServeConfig {
            artifact_path,
            static_dir: dir.join("static"),
            ..ServeConfig::default()
        })
        .unwrap()
    }

    /// Fits and loads fine, but every prediction overflows to a
    /// non-finite amount.
    fn overflowing_purchase_server(dir: &Path) -> PredictionServer {
        let names = PURCHASE_FEATURES.iter().map(|s| s.to_string()).collect();
        let ds    = Dataset::new(
            names,
            vec![vec![25.0, 1.0], vec![35.0, 0.0], vec![45.0, 1.0], vec![55.0, 0.0]],
            vec![f64::MAX; 4],
        )
        .unwrap();
        let params    = ForestParams { n_estimators: 3, seed: 1, ..ForestParams::default() };
        let artifact  = ModelArtifact::PurchaseRegressor(RandomForestRegressor::fit(&ds, params).unwrap());
        let predictor = PredictUseCase::new(Inferencer::new(artifact).unwrap());
        PredictionServer::with_predictor(
            ServeConfig { static_dir: dir.join("static"), ..ServeConfig::default() },
            predictor,
        )
    }

    fn example_patient() -> Value {
        json!({
            "MemoryComplaints": 1, "Forgetfulness": 0, "Disorientation": 1, "Confusion": 0,
            "Depression": 0, "FamilyHistoryAlzheimers": 1, "Age": 72,
            "BehavioralProblems": 0, "CardiovascularDisease": 0, "PhysicalActivity": 3
        })
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec())
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes  = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root_and_health_payloads() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (status, body) = fetch(server.router(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"message": "Welcome to the Alzheimer's Detection Tool!"}));

        let (status, body) = fetch(server.router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"status": "Healthy"}));
    }

    #[tokio::test]
    async fn test_predict_example_patient() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (status, body) = post_json(server.router(), example_patient().to_string()).await;
        assert_eq!(status, StatusCode::OK);
        let risk = body["predicted_risk"].as_str().unwrap();
        assert!(risk == "High Risk of Alzheimer's" || risk == "Low Risk of Alzheimer's");
    }

    #[tokio::test]
    async fn test_predict_is_idempotent() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (_, first)  = post_json(server.router(), example_patient().to_string()).await;
        let (_, second) = post_json(server.router(), example_patient().to_string()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_binary_field_out_of_range_is_422() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        for field in ["MemoryComplaints", "Depression", "CardiovascularDisease"] {
            let mut body = example_patient();
            body[field]  = json!(2);
            let (status, response) = post_json(server.router(), body.to_string()).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(response["error"], "validation_failed");
            assert_eq!(response["detail"][0]["field"], field);
            assert_eq!(response["detail"][0]["kind"], "out_of_range");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_are_all_listed() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (status, response) = post_json(server.router(), json!({"Age": 70}).to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["detail"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (status, response) = post_json(server.router(), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "malformed_request");
    }

    #[tokio::test]
    async fn test_comparison_renders_and_serves_chart() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(risk_artifact(), dir.path());

        let (status, body) = fetch(server.router(), "/comparison").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap(), "<img src='/static/comparison_plot.svg'>");

        let (status, body) = fetch(server.router(), "/static/comparison_plot.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("<svg"));
    }

    #[tokio::test]
    async fn test_purchase_variant_routes() {
        let dir    = tempfile::tempdir().unwrap();
        let server = server_for(purchase_artifact(), dir.path());

        let (_, body) = fetch(server.router(), "/").await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Welcome to the E-commerce Purchase Prediction API!");

        let (status, response) =
            post_json(server.router(), json!({"age": 40, "gender": "Male"}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(response["predicted_purchase_amount"].is_f64());

        let (status, response) =
            post_json(server.router(), json!({"age": 40, "gender": "Other"}).to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["detail"][0]["kind"], "not_allowed");

        let (status, _) = fetch(server.router(), "/comparison").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_inference_fault_is_opaque_500() {
        let dir    = tempfile::tempdir().unwrap();
        let server = overflowing_purchase_server(dir.path());

        let (status, response) =
            post_json(server.router(), json!({"age": 40, "gender": "Male"}).to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response, json!({"error": "internal_error", "detail": "Internal server error"}));
        assert!(!response.to_string().contains("non-finite"));
    }

    #[test]
    fn test_startup_fails_on_tampered_artifact() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        ArtifactStore::new(&path).save(&risk_artifact()).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"n_estimators\":5"));
        std::fs::write(&path, json.replacen("\"n_estimators\":5", "\"n_estimators\":0", 1)).unwrap();

        let result = PredictionServer::new(ServeConfig { artifact_path: path, ..ServeConfig::default() });
        let err = result.err().unwrap();
        assert!(format!("{err:#}").contains("checksum mismatch"));
    }

    #[test]
    fn test_startup_fails_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let result = PredictionServer::new(ServeConfig {
            artifact_path: dir.path().join("missing.json"),
            ..ServeConfig::default()
        });
        let err = result.err().unwrap();
        assert!(format!("{err:#}").contains("Cannot read model artifact"));
    }
}
