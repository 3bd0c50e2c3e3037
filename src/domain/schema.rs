// ============================================================
// Layer 3 — Request Schema
// ============================================================
// A fixed, declarative description of what a prediction request
// must look like: which named fields exist, what JSON type each
// one carries, and (for some) an inclusive numeric range.
//
// Validation walks EVERY declared field and collects every
// violation, so a caller learns about all bad fields at once
// instead of fixing them one round-trip at a time.
//
// Nothing is coerced. A JSON string "1", a float 1.0 or a
// boolean true is NOT an integer here, even though a lenient
// parser might accept them.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)
//            serde_json::Value documentation

use serde::Serialize;
use serde_json::Value;

/// The declared type (and optional constraint) of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON integer that fits in an i64
    Integer,

    /// A JSON integer inside the inclusive range [min, max]
    BoundedInteger { min: i64, max: i64 },

    /// A JSON string that must be one of the listed values
    Choice(&'static [&'static str]),
}

/// One named field of a request schema
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Integer }
    }

    /// An integer restricted to {0, 1}
    pub const fn binary(name: &'static str) -> Self {
        Self { name, kind: FieldKind::BoundedInteger { min: 0, max: 1 } }
    }

    pub const fn choice(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self { name, kind: FieldKind::Choice(allowed) }
    }
}

/// Machine-readable category of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The request body is not a JSON object at all
    NotAnObject,
    Missing,
    WrongType,
    OutOfRange,
    NotAllowed,
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field:   String,
    pub kind:    ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Check `body` against every field in `fields`.
///
/// Returns Ok(()) only when all declared fields are present and
/// satisfy their kind. Extra, undeclared fields are ignored.
pub fn validate(fields: &[FieldSpec], body: &Value) -> Result<(), Vec<FieldViolation>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldViolation::new(
            "body",
            ViolationKind::NotAnObject,
            "request body must be a JSON object",
        )]);
    };

    let violations: Vec<FieldViolation> = fields
        .iter()
        .filter_map(|spec| match object.get(spec.name) {
            None        => Some(FieldViolation::new(spec.name, ViolationKind::Missing, "field required")),
            Some(value) => check_field(spec, value).err(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<(), FieldViolation> {
    match spec.kind {
        FieldKind::Integer => {
            expect_integer(spec.name, value)?;
            Ok(())
        }
        FieldKind::BoundedInteger { min, max } => {
            let n = expect_integer(spec.name, value)?;
            if n < min || n > max {
                return Err(FieldViolation::new(
                    spec.name,
                    ViolationKind::OutOfRange,
                    format!("value must be between {min} and {max} inclusive, got {n}"),
                ));
            }
            Ok(())
        }
        FieldKind::Choice(allowed) => {
            let Some(s) = value.as_str() else {
                return Err(FieldViolation::new(
                    spec.name,
                    ViolationKind::WrongType,
                    format!("expected a string, got {}", json_type_name(value)),
                ));
            };
            if !allowed.contains(&s) {
                return Err(FieldViolation::new(
                    spec.name,
                    ViolationKind::NotAllowed,
                    format!("value must be one of {allowed:?}, got {s:?}"),
                ));
            }
            Ok(())
        }
    }
}

/// serde_json only reports `as_i64` for numbers that were written as
/// integers, so `1.0` is rejected here.
fn expect_integer(field: &str, value: &Value) -> Result<i64, FieldViolation> {
    value.as_i64().ok_or_else(|| {
        let message = match value {
            Value::Number(_) => "expected an integer that fits in 64 bits".to_string(),
            other            => format!("expected an integer, got {}", json_type_name(other)),
        };
        FieldViolation::new(field, ViolationKind::WrongType, message)
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(n) => if n.is_f64() { "float" } else { "integer" },
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
