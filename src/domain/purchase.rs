// ============================================================
// Layer 3 — Purchase Domain Types
// ============================================================
// The regression variant predicts how much a customer will
// spend from their age and gender.
//
// Gender is one-hot encoded with the first category dropped,
// so the model sees a single indicator column `Gender_Male`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::schema::{self, FieldSpec, FieldViolation, ViolationKind};

/// Default name of the continuous target column
pub const TARGET_COLUMN: &str = "PurchaseAmount";

pub const DROP_COLUMNS: &[&str] = &["CustomerID", "TransactionID"];

/// Raw categorical column and the indicator derived from it
pub const GENDER_COLUMN:    &str = "Gender";
pub const GENDER_INDICATOR: &str = "Gender_Male";

/// Model input columns, in training order
pub const PURCHASE_FEATURES: [&str; 2] = ["Age", GENDER_INDICATOR];

pub const PURCHASE_SCHEMA: &[FieldSpec] = &[
    FieldSpec::integer("age"),
    FieldSpec::choice("gender", &["Male", "Female"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn indicator(self) -> f64 {
        match self {
            Gender::Male   => 1.0,
            Gender::Female => 0.0,
        }
    }
}

/// One validated purchase prediction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub age:    i64,
    pub gender: Gender,
}

impl PurchaseInput {
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldViolation>> {
        schema::validate(PURCHASE_SCHEMA, body)?;
        serde_json::from_value(body.clone()).map_err(|e| {
            vec![FieldViolation::new("body", ViolationKind::WrongType, e.to_string())]
        })
    }

    /// Feature vector in PURCHASE_FEATURES order
    pub fn to_feature_vector(&self) -> Vec<f64> {
        vec![self.age as f64, self.gender.indicator()]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_male_sets_indicator() {
        let input = PurchaseInput::from_json(&json!({"age": 31, "gender": "Male"})).unwrap();
        assert_eq!(input.to_feature_vector(), vec![31.0, 1.0]);
    }

    #[test]
    fn test_female_clears_indicator() {
        let input = PurchaseInput::from_json(&json!({"age": 45, "gender": "Female"})).unwrap();
        assert_eq!(input.to_feature_vector(), vec![45.0, 0.0]);
    }

    #[test]
    fn test_unknown_gender_is_rejected() {
        let errors = PurchaseInput::from_json(&json!({"age": 45, "gender": "male"})).unwrap_err();
        assert_eq!(errors[0].field, "gender");
        assert_eq!(errors[0].kind,  ViolationKind::NotAllowed);
    }
}
