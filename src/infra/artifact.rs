// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores a fitted model as a single JSON file.
//
// What gets saved:
//   {
//     "format_version": 1,
//     "checksum": "<sha256 of the model object>",
//     "model": {
//       "kind": "risk_classifier" | "purchase_regressor",
//       "feature_names": [...],   ← column order the model expects
//       "classes": [...],         ← classifier only
//       "params": {...},          ← hyper-parameters used
//       "forest": {...}           ← smartcore's fitted trees
//     }
//   }
//
// The file is written once per training run, replacing any
// earlier artifact at the same path. The service reads it once
// at startup, and every check below is fatal there:
//
//   read → parse → format version → checksum → decode → validate
//
// The checksum covers the model object's canonical JSON, so any
// edit to the trees made outside `save` is caught before the
// forest is ever walked.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::{fs, path::PathBuf};

use crate::domain::traits::Predictor;
use crate::ml::forest::{RandomForestClassifier, RandomForestRegressor};

/// Bumped whenever the on-disk layout changes incompatibly
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// A fitted model of either variant
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RiskClassifier(RandomForestClassifier),
    PurchaseRegressor(RandomForestRegressor),
}

impl ModelArtifact {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ModelArtifact::RiskClassifier(_)    => "risk_classifier",
            ModelArtifact::PurchaseRegressor(_) => "purchase_regressor",
        }
    }

    pub fn feature_names(&self) -> &[String] {
        match self {
            ModelArtifact::RiskClassifier(m)    => m.feature_names(),
            ModelArtifact::PurchaseRegressor(m) => m.feature_names(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::RiskClassifier(m)    => m.validate(),
            ModelArtifact::PurchaseRegressor(m) => m.validate(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    format_version: u32,
    checksum:       String,
    model:          Value,
}

/// SHA-256 of the model's compact JSON, lowercase hex
fn checksum(model: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Reads and writes one artifact file.
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialise `model`, replacing whatever is at the path.
    pub fn save(&self, model: &ModelArtifact) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let model_json = serde_json::to_value(model).context("Cannot serialise model artifact")?;
        let file = ArtifactFile {
            format_version: ARTIFACT_FORMAT_VERSION,
            checksum:       checksum(&model_json),
            model:          model_json,
        };
        let json = serde_json::to_string(&file).context("Cannot serialise model artifact")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write artifact to '{}'", self.path.display()))?;

        tracing::info!(
            "Saved {} artifact to '{}'",
            model.kind_name(),
            self.path.display()
        );
        Ok(())
    }

    /// Load and check the artifact. Missing, corrupt, tampered or
    /// version-mismatched files are errors.
    pub fn load(&self) -> Result<ModelArtifact> {
        let json = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read model artifact '{}'. Have you run training first?",
                self.path.display()
            )
        })?;

        let file: ArtifactFile = serde_json::from_str(&json)
            .with_context(|| format!("Model artifact '{}' is corrupt", self.path.display()))?;

        if file.format_version != ARTIFACT_FORMAT_VERSION {
            bail!(
                "Model artifact '{}' has format version {}, expected {}",
                self.path.display(),
                file.format_version,
                ARTIFACT_FORMAT_VERSION
            );
        }

        let actual = checksum(&file.model);
        if actual != file.checksum {
            bail!(
                "Model artifact '{}' is corrupt: checksum mismatch (expected {}, got {})",
                self.path.display(),
                file.checksum,
                actual
            );
        }

        let model: ModelArtifact = serde_json::from_value(file.model)
            .with_context(|| format!("Model artifact '{}' is corrupt", self.path.display()))?;
        model
            .validate()
            .with_context(|| format!("Model artifact '{}' is corrupt", self.path.display()))?;

        tracing::info!(
            "Loaded {} artifact from '{}' ({} features)",
            model.kind_name(),
            self.path.display(),
            model.feature_names().len()
        );
        Ok(model)
    }
}
