// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// One prediction, start to finish:
//
//   1. Validate the raw JSON body against the variant's schema
//   2. Assemble the feature row in training order
//   3. Ask the inferencer
//   4. Shape the answer
//
// Shared by the HTTP service and the `predict` CLI command, so
// both paths behave identically. The use case holds the model
// behind an Arc and never mutates it, so one instance serves
// every request concurrently.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::patient::RiskInput;
use crate::domain::purchase::PurchaseInput;
use crate::domain::schema::FieldViolation;
use crate::infra::artifact::ArtifactStore;
use crate::ml::inferencer::{Inferencer, ServiceVariant};

/// Why a prediction did not produce an answer
#[derive(Debug, Error)]
pub enum PredictError {
    /// The caller sent a body that does not fit the schema
    #[error("request failed validation ({} field(s))", .0.len())]
    Invalid(Vec<FieldViolation>),

    /// The model itself failed; the cause stays server-side
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Risk { predicted_risk: String },
    Purchase { predicted_purchase_amount: f64 },
}

#[derive(Clone)]
pub struct PredictUseCase {
    inferencer: Arc<Inferencer>,
}

impl PredictUseCase {
    pub fn new(inferencer: Inferencer) -> Self {
        Self { inferencer: Arc::new(inferencer) }
    }

    /// Load the artifact once and build the use case around it.
    pub fn from_artifact(store: &ArtifactStore) -> anyhow::Result<Self> {
        Ok(Self::new(Inferencer::from_artifact(store)?))
    }

    pub fn variant(&self) -> ServiceVariant {
        self.inferencer.variant()
    }

    pub fn welcome_message(&self) -> &'static str {
        match self.variant() {
            ServiceVariant::Risk     => "Welcome to the Alzheimer's Detection Tool!",
            ServiceVariant::Purchase => "Welcome to the E-commerce Purchase Prediction API!",
        }
    }

    pub fn predict_json(&self, body: &Value) -> Result<PredictionResponse, PredictError> {
        match self.variant() {
            ServiceVariant::Risk => {
                let input = RiskInput::from_json(body).map_err(PredictError::Invalid)?;
                let risk  = self.inferencer.predict_risk(&input).map_err(PredictError::Inference)?;
                Ok(PredictionResponse::Risk { predicted_risk: risk.as_str().to_string() })
            }
            ServiceVariant::Purchase => {
                let input  = PurchaseInput::from_json(body).map_err(PredictError::Invalid)?;
                let amount = self
                    .inferencer
                    .predict_purchase(&input)
                    .map_err(PredictError::Inference)?;
                Ok(PredictionResponse::Purchase { predicted_purchase_amount: amount })
            }
        }
    }
}
