// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the risk-classifier training pipeline in order:
//
//   Step 1: Load the CSV                    (Layer 4 - data)
//   Step 2: Drop identifier columns         (Layer 3 - domain)
//   Step 3: Categorise the Diagnosis label  (Layer 4 - data)
//   Step 4: Select the ten feature columns  (Layer 4 - data)
//   Step 5: Stratified train/test split     (Layer 4 - data)
//   Step 6: Fit the forest + score it       (Layer 5 - ml)
//   Step 7: Save the artifact               (Layer 6 - infra)
//
// The run stops at the first failure; nothing is retried and no
// partial artifact is written.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            scikit-learn RandomForestClassifier documentation

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::{feature_matrix, Dataset},
    encoder::categorize,
    loader::CsvLoader,
    splitter::stratified_split,
};
use crate::domain::patient::{DROP_COLUMNS, LABEL_COLUMN, RISK_FEATURES};
use crate::domain::traits::TableSource;
use crate::infra::{
    artifact::{ArtifactStore, ModelArtifact},
    metrics::ConfusionMatrix,
};
use crate::ml::forest::{ForestParams, MaxFeatures};
use crate::ml::trainer::train_classifier;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a classifier training run. The same seed drives
// both the split and the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:         PathBuf,
    pub artifact_path:     PathBuf,
    pub test_fraction:     f64,
    pub seed:              u64,
    pub n_estimators:      usize,
    pub max_features:      usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:         PathBuf::from("alzheimers_disease_data.csv"),
            artifact_path:     PathBuf::from("rf_model_tuned5.json"),
            test_fraction:     0.3,
            seed:              123,
            n_estimators:      100,
            max_features:      3,
            max_depth:         None,
            min_samples_split: 2,
            min_samples_leaf:  1,
        }
    }
}

impl TrainConfig {
    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators:      self.n_estimators,
            max_depth:         self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf:  self.min_samples_leaf,
            max_features:      MaxFeatures::Count(self.max_features),
            seed:              self.seed,
        }
    }
}

/// Outcome of a training run, for printing and for tests.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub n_train:       usize,
    pub n_test:        usize,
    pub confusion:     ConfusionMatrix,
    pub artifact_path: PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let mut table = CsvLoader::new(&cfg.data_path).load()?;
        if table.is_empty() {
            bail!("'{}' has no data rows", cfg.data_path.display());
        }

        // ── Step 2: Drop identifiers (absent ones are fine) ──────────────────
        let dropped = table.drop_columns_if_present(DROP_COLUMNS);
        tracing::info!("Dropped columns: {:?}", dropped);

        // ── Step 3: Label → categories ────────────────────────────────────────
        let labels = categorize(&table.column(LABEL_COLUMN)?)
            .with_context(|| format!("Cannot encode label column '{LABEL_COLUMN}'"))?;
        tracing::info!("{} label categories: {:?}", labels.n_classes(), labels.classes);

        // ── Step 4: Features ──────────────────────────────────────────────────
        let selected = table.select(&RISK_FEATURES)?;
        let records  = feature_matrix(&selected, &RISK_FEATURES)?;
        let dataset  = Dataset::new(
            RISK_FEATURES.iter().map(|s| s.to_string()).collect(),
            records,
            labels.codes.clone(),
        )?;

        // ── Step 5: Stratified split ──────────────────────────────────────────
        let split = stratified_split(&labels.codes, cfg.test_fraction, cfg.seed)?;
        let train = dataset.subset(&split.train);
        let test  = dataset.subset(&split.test);
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 6: Fit + evaluate ────────────────────────────────────────────
        let (model, confusion) =
            train_classifier(&train, &test, labels.classes, cfg.forest_params())?;

        // ── Step 7: Persist ───────────────────────────────────────────────────
        ArtifactStore::new(&cfg.artifact_path).save(&ModelArtifact::RiskClassifier(model))?;

        Ok(TrainReport {
            n_train:       train.len(),
            n_test:        test.len(),
            confusion,
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

    /// A synthetic patient file where MemoryComplaints drives Diagnosis
    fn write_patients(path: &Path, n: usize) {
        let mut csv = String::from(
            "PatientID,Age,Gender,MemoryComplaints,Forgetfulness,Disorientation,Confusion,\
             Depression,FamilyHistoryAlzheimers,BehavioralProblems,CardiovascularDisease,\
             PhysicalActivity,Diagnosis,DoctorInCharge\n",
        );
        for i in 0..n {
            let memory = (i % 3 == 0) as u8;
            let forget = (i % 4 == 0) as u8;
            let diag   = memory;
            writeln!(
                csv,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},XXXConfid",
                4751 + i,
                60 + (i * 7) % 30,
                i % 2,
                memory,
                forget,
                (i % 5 == 0) as u8,
                (i % 6 == 0) as u8,
                (i % 7 == 0) as u8,
                (i % 2) as u8,
                (i % 9 == 0) as u8,
                (i % 8 == 0) as u8,
                (i * 3) % 10,
                diag
            )
            .unwrap();
        }
        std::fs::write(path, csv).unwrap();
    }

    fn config(dir: &Path) -> TrainConfig {
        TrainConfig {
            data_path:     dir.join("patients.csv"),
            artifact_path: dir.join("out/rf_model.json"),
            n_estimators:  20,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_run() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.test_fraction, 0.3);
        assert_eq!(cfg.seed, 123);
        assert_eq!(cfg.n_estimators, 100);
        assert_eq!(cfg.max_features, 3);
    }

    #[test]
    fn test_train_writes_artifact_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        write_patients(&dir.path().join("patients.csv"), 90);

        let report = TrainUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(report.n_test, 27);
        assert_eq!(report.n_train, 63);
        assert_eq!(report.confusion.total(), 27);
        assert_eq!(report.confusion.classes(), &["0", "1"]);
        assert!(report.confusion.accuracy() > 0.8);

        let model = ArtifactStore::new(&report.artifact_path).load().unwrap();
        assert_eq!(model.kind_name(), "risk_classifier");
        assert_eq!(model.feature_names(), &RISK_FEATURES);
    }

    #[test]
    fn test_training_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_patients(&dir.path().join("patients.csv"), 90);

        let first  = TrainUseCase::new(config(dir.path())).execute().unwrap();
        let model1 = std::fs::read(&first.artifact_path).unwrap();
        let second = TrainUseCase::new(config(dir.path())).execute().unwrap();
        let model2 = std::fs::read(&second.artifact_path).unwrap();

        assert_eq!(first.confusion, second.confusion);
        assert_eq!(model1, model2);
    }

    #[test]
    fn test_missing_feature_column_fails() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("patients.csv");
        std::fs::write(&path, "Age,Diagnosis\n70,0\n71,1\n72,0\n73,1\n").unwrap();

        let err = TrainUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(format!("{err:#}").contains("missing required column"));
        assert!(!dir.path().join("out/rf_model.json").exists());
    }

    #[test]
    fn test_missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(err.to_string().contains("Cannot open CSV file"));
    }
}
