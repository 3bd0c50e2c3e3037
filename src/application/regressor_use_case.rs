// ============================================================
// Layer 2 — RegressorUseCase
// ============================================================
// Trains the purchase-amount regressor:
//
//   Step 1: Load the CSV                          (Layer 4 - data)
//   Step 2: Drop CustomerID / TransactionID       (Layer 3 - domain)
//   Step 3: Gender → Gender_Male indicator        (Layer 4 - data)
//   Step 4: Select Age, Gender_Male + target      (Layer 4 - data)
//   Step 5: Seeded shuffle split                  (Layer 4 - data)
//   Step 6: Fit the regressor + score it          (Layer 5 - ml)
//   Step 7: Save the artifact                     (Layer 6 - infra)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::{feature_matrix, Dataset},
    encoder::indicator_column,
    loader::CsvLoader,
    splitter::shuffle_split,
};
use crate::domain::purchase::{
    DROP_COLUMNS, GENDER_COLUMN, GENDER_INDICATOR, PURCHASE_FEATURES, TARGET_COLUMN,
};
use crate::domain::traits::TableSource;
use crate::infra::{
    artifact::{ArtifactStore, ModelArtifact},
    metrics::RegressionMetrics,
};
use crate::ml::forest::{ForestParams, MaxFeatures};
use crate::ml::trainer::train_regressor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressorConfig {
    pub data_path:     PathBuf,
    pub artifact_path: PathBuf,
    pub target:        String,
    pub test_fraction: f64,
    pub seed:          u64,
    pub n_estimators:  usize,
    pub max_depth:     Option<usize>,
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self {
            data_path:     PathBuf::from("ecommerce_transactions.csv"),
            artifact_path: PathBuf::from("purchase_predictor_model.json"),
            target:        TARGET_COLUMN.to_string(),
            test_fraction: 0.3,
            seed:          123,
            n_estimators:  100,
            max_depth:     None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegressorReport {
    pub n_train:       usize,
    pub n_test:        usize,
    pub metrics:       RegressionMetrics,
    pub artifact_path: PathBuf,
}

pub struct RegressorUseCase {
    config: RegressorConfig,
}

impl RegressorUseCase {
    pub fn new(config: RegressorConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<RegressorReport> {
        let cfg = &self.config;

        let mut table = CsvLoader::new(&cfg.data_path).load()?;
        if table.is_empty() {
            bail!("'{}' has no data rows", cfg.data_path.display());
        }
        let dropped = table.drop_columns_if_present(DROP_COLUMNS);
        tracing::info!("Dropped columns: {:?}", dropped);

        indicator_column(&mut table, GENDER_COLUMN, "Male", GENDER_INDICATOR)?;

        let targets = table.numeric_column(&cfg.target)?;
        let records = feature_matrix(&table.select(&PURCHASE_FEATURES)?, &PURCHASE_FEATURES)?;
        let dataset = Dataset::new(
            PURCHASE_FEATURES.iter().map(|s| s.to_string()).collect(),
            records,
            targets,
        )?;

        let split = shuffle_split(dataset.len(), cfg.test_fraction, cfg.seed)?;
        let train = dataset.subset(&split.train);
        let test  = dataset.subset(&split.test);
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        let params = ForestParams {
            n_estimators: cfg.n_estimators,
            max_depth:    cfg.max_depth,
            max_features: MaxFeatures::All,
            seed:         cfg.seed,
            ..ForestParams::default()
        };
        let (model, metrics) = train_regressor(&train, &test, params)?;

        ArtifactStore::new(&cfg.artifact_path).save(&ModelArtifact::PurchaseRegressor(model))?;

        Ok(RegressorReport {
            n_train:       train.len(),
            n_test:        test.len(),
            metrics,
            artifact_path: cfg.artifact_path.clone(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::path::Path;

    fn write_transactions(path: &Path, n: usize) {
        let mut csv = String::from("CustomerID,TransactionID,Age,Gender,PurchaseAmount\n");
        for i in 0..n {
            let age    = 18 + (i * 5) % 50;
            let gender = if i % 2 == 0 { "Male" } else { "Female" };
            let amount = age as f64 * 10.0 + if i % 2 == 0 { 50.0 } else { 0.0 };
            writeln!(csv, "C{i},T{i},{age},{gender},{amount}").unwrap();
        }
        std::fs::write(path, csv).unwrap();
    }

    fn config(dir: &Path) -> RegressorConfig {
        RegressorConfig {
            data_path:     dir.join("tx.csv"),
            artifact_path: dir.join("purchase.json"),
            n_estimators:  10,
            ..RegressorConfig::default()
        }
    }

    #[test]
    fn test_regressor_trains_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        write_transactions(&dir.path().join("tx.csv"), 60);

        let report = RegressorUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(report.n_test, 18);
        assert_eq!(report.n_train, 42);
        assert!(report.metrics.r2 > 0.5);

        let model = ArtifactStore::new(&report.artifact_path).load().unwrap();
        assert_eq!(model.kind_name(), "purchase_regressor");
        assert_eq!(model.feature_names(), &PURCHASE_FEATURES);
    }

    #[test]
    fn test_missing_target_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_transactions(&dir.path().join("tx.csv"), 10);

        let cfg = RegressorConfig { target: "Spend".into(), ..config(dir.path()) };
        let err = RegressorUseCase::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("Spend"));
    }

    #[test]
    fn test_missing_gender_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx.csv"), "Age,PurchaseAmount\n30,100\n40,200\n").unwrap();
        assert!(RegressorUseCase::new(config(dir.path())).execute().is_err());
    }
}
