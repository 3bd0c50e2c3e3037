// ============================================================
// Layer 5 — Trainer
// ============================================================
// Fits a forest on the training partition and immediately
// scores it on the held-out partition:
//
//   classifier → confusion matrix (+ accuracy)
//   regressor  → MAE / RMSE / R²
//
// Fitting is seeded, so two runs over the same partitions
// produce the same model and the same scores.

use anyhow::{bail, Result};
use std::time::Instant;

use crate::data::dataset::Dataset;
use crate::domain::traits::Predictor;
use crate::infra::metrics::{ConfusionMatrix, RegressionMetrics};
use crate::ml::forest::{ForestParams, RandomForestClassifier, RandomForestRegressor};

pub fn train_classifier(
    train:   &Dataset<usize>,
    test:    &Dataset<usize>,
    classes: Vec<String>,
    params:  ForestParams,
) -> Result<(RandomForestClassifier, ConfusionMatrix)> {
    if test.is_empty() {
        bail!("held-out partition is empty");
    }
    let started = Instant::now();
    tracing::info!(
        "Fitting random forest: {} trees, max_features={:?}, seed={}",
        params.n_estimators,
        params.max_features,
        params.seed
    );

    let model = RandomForestClassifier::fit(train, classes, params)?;
    tracing::info!(
        "Fitted {} trees on {} rows x {} features in {:.2?}",
        model.n_trees(),
        train.len(),
        train.n_features(),
        started.elapsed()
    );

    let predicted = model.predict_codes(&test.records)?;
    let confusion = ConfusionMatrix::from_codes(model.classes().to_vec(), &test.targets, &predicted)?;
    tracing::info!("Held-out accuracy: {:.4}", confusion.accuracy());

    Ok((model, confusion))
}

pub fn train_regressor(
    train:  &Dataset<f64>,
    test:   &Dataset<f64>,
    params: ForestParams,
) -> Result<(RandomForestRegressor, RegressionMetrics)> {
    if test.is_empty() {
        bail!("held-out partition is empty");
    }
    let started = Instant::now();
    tracing::info!(
        "Fitting random forest regressor: {} trees, max_features={:?}, seed={}",
        params.n_estimators,
        params.max_features,
        params.seed
    );

    let model = RandomForestRegressor::fit(train, params)?;
    tracing::info!(
        "Fitted {} trees on {} rows x {} features in {:.2?}",
        model.n_trees(),
        train.len(),
        train.n_features(),
        started.elapsed()
    );

    let predicted = model.predict(&test.records)?;
    let metrics   = RegressionMetrics::compute(&test.targets, &predicted)?;
    tracing::info!("Held-out RMSE: {:.4}", metrics.rmse);

    Ok((model, metrics))
}
