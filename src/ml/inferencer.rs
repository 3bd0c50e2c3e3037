// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Wraps a loaded artifact and turns validated requests into
// answers. The artifact kind decides which service variant is
// running:
//
//   risk_classifier    → RiskInput     → RiskLevel
//   purchase_regressor → PurchaseInput → amount (f64)
//
// The feature order the artifact was fitted on is checked once,
// at construction, against the order the request types assemble.
// A mismatch refuses to build rather than silently feeding the
// model columns in the wrong order.

use anyhow::{bail, Result};

use crate::domain::patient::{RiskInput, RiskLevel, RISK_FEATURES};
use crate::domain::purchase::{PurchaseInput, PURCHASE_FEATURES};
use crate::domain::traits::Predictor;
use crate::infra::artifact::{ArtifactStore, ModelArtifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceVariant {
    Risk,
    Purchase,
}

pub struct Inferencer {
    model: ModelArtifact,
}

impl Inferencer {
    pub fn new(model: ModelArtifact) -> Result<Self> {
        let expected: &[&str] = match &model {
            ModelArtifact::RiskClassifier(_)    => &RISK_FEATURES,
            ModelArtifact::PurchaseRegressor(_) => &PURCHASE_FEATURES,
        };
        let actual = model.feature_names();
        if actual.len() != expected.len() || actual.iter().zip(expected).any(|(a, e)| a != e) {
            bail!(
                "{} artifact was fitted on features {:?}, but requests supply {:?}",
                model.kind_name(),
                actual,
                expected
            );
        }
        Ok(Self { model })
    }

    pub fn from_artifact(store: &ArtifactStore) -> Result<Self> {
        let inferencer = Self::new(store.load()?)?;
        tracing::info!("Model ready: {:?} service", inferencer.variant());
        Ok(inferencer)
    }

    pub fn variant(&self) -> ServiceVariant {
        match self.model {
            ModelArtifact::RiskClassifier(_)    => ServiceVariant::Risk,
            ModelArtifact::PurchaseRegressor(_) => ServiceVariant::Purchase,
        }
    }

    pub fn predict_risk(&self, input: &RiskInput) -> Result<RiskLevel> {
        let ModelArtifact::RiskClassifier(model) = &self.model else {
            bail!("loaded model is a {}, not a risk classifier", self.model.kind_name());
        };
        let label = model.predict_one(&input.to_feature_vector())?;
        Ok(RiskLevel::from_class_label(&label))
    }

    pub fn predict_purchase(&self, input: &PurchaseInput) -> Result<f64> {
        let ModelArtifact::PurchaseRegressor(model) = &self.model else {
            bail!("loaded model is a {}, not a purchase regressor", self.model.kind_name());
        };
        let amount = model.predict_one(&input.to_feature_vector())?;
        if !amount.is_finite() {
            bail!("model produced a non-finite amount");
        }
        Ok(amount)
    }
}
