// ============================================================
// Layer 3 — Patient Risk Domain Types
// ============================================================
// Everything the Alzheimer's risk model knows about a patient:
//
//   RISK_FEATURES  — the ten input columns, in the exact order
//                    the forest was fitted on
//   RiskInput      — one prediction request (label excluded)
//   RiskLevel      — the human-readable answer
//   NORMAL_VALUES  — reference values drawn on /comparison
//
// The binary fields (symptoms, history, comorbidities) only
// accept 0 or 1. Age and PhysicalActivity are plain integers
// with no declared range.
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::schema::{self, FieldSpec, FieldViolation, ViolationKind};

/// Name of the label column in the training CSV
pub const LABEL_COLUMN: &str = "Diagnosis";

/// Identifier / non-predictive columns removed before training
pub const DROP_COLUMNS: &[&str] = &["PatientID", "DoctorInCharge"];

/// Model input columns, in training order
pub const RISK_FEATURES: [&str; 10] = [
    "MemoryComplaints",
    "Forgetfulness",
    "Disorientation",
    "Confusion",
    "Depression",
    "FamilyHistoryAlzheimers",
    "Age",
    "BehavioralProblems",
    "CardiovascularDisease",
    "PhysicalActivity",
];

/// Request schema for POST /predict on the risk service
pub const RISK_SCHEMA: &[FieldSpec] = &[
    FieldSpec::binary("MemoryComplaints"),
    FieldSpec::binary("Forgetfulness"),
    FieldSpec::binary("Disorientation"),
    FieldSpec::binary("Confusion"),
    FieldSpec::binary("Depression"),
    FieldSpec::binary("FamilyHistoryAlzheimers"),
    FieldSpec::integer("Age"),
    FieldSpec::binary("BehavioralProblems"),
    FieldSpec::binary("CardiovascularDisease"),
    FieldSpec::integer("PhysicalActivity"),
];

/// "Healthy baseline" values plotted by the comparison chart
pub const NORMAL_VALUES: [(&str, f64); 10] = [
    ("MemoryComplaints",        0.0),
    ("Forgetfulness",           0.0),
    ("Disorientation",          0.0),
    ("Confusion",               0.0),
    ("Depression",              0.0),
    ("FamilyHistoryAlzheimers", 0.0),
    ("Age",                     65.0),
    ("BehavioralProblems",      0.0),
    ("CardiovascularDisease",   0.0),
    ("PhysicalActivity",        8.0),
];

/// One validated risk prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RiskInput {
    pub memory_complaints:         i64,
    pub forgetfulness:             i64,
    pub disorientation:            i64,
    pub confusion:                 i64,
    pub depression:                i64,
    pub family_history_alzheimers: i64,
    pub age:                       i64,
    pub behavioral_problems:       i64,
    pub cardiovascular_disease:    i64,
    pub physical_activity:         i64,
}

impl RiskInput {
    /// Validate a raw JSON body against RISK_SCHEMA and build the input.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldViolation>> {
        schema::validate(RISK_SCHEMA, body)?;
        serde_json::from_value(body.clone()).map_err(|e| {
            vec![FieldViolation::new("body", ViolationKind::WrongType, e.to_string())]
        })
    }

    /// Feature vector in RISK_FEATURES order.
    pub fn to_feature_vector(&self) -> Vec<f64> {
        vec![
            self.memory_complaints as f64,
            self.forgetfulness as f64,
            self.disorientation as f64,
            self.confusion as f64,
            self.depression as f64,
            self.family_history_alzheimers as f64,
            self.age as f64,
            self.behavioral_problems as f64,
            self.cardiovascular_disease as f64,
            self.physical_activity as f64,
        ]
    }
}

/// The two possible answers of the risk service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Map a predicted class label onto a risk level.
    /// Only the positive diagnosis class (1) is high risk.
    pub fn from_class_label(label: &str) -> Self {
        match label.trim().parse::<f64>() {
            Ok(v) if v == 1.0 => RiskLevel::High,
            _                 => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk of Alzheimer's",
            RiskLevel::Low  => "Low Risk of Alzheimer's",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
