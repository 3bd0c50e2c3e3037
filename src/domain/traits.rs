// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//
//   TableSource — anything that can produce a RawTable
//                 (CsvLoader today)
//   Predictor   — anything that can score rows of features
//                 (RandomForestClassifier, RandomForestRegressor)
//
// The application layer programs against these traits, so the
// training and serving workflows never name a concrete loader
// or model type in their signatures.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::table::RawTable;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can load a tabular dataset.
pub trait TableSource {
    /// Load the full table, header included.
    fn load(&self) -> Result<RawTable>;
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// A fitted model that maps feature rows to outputs.
///
/// Implementations must be read-only at prediction time so a single
/// instance can be shared across concurrent requests.
pub trait Predictor: Send + Sync {
    /// The per-row prediction (a class label or a continuous value)
    type Output;

    /// Ordered feature names the model was fitted on.
    /// Every row passed to `predict` must follow this order.
    fn feature_names(&self) -> &[String];

    /// Predict one output per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Self::Output>>;

    /// Convenience wrapper for a single row.
    fn predict_one(&self, row: &[f64]) -> Result<Self::Output> {
        self.predict(&[row.to_vec()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("model returned no prediction"))
    }
}
