// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define what the
// system talks about: raw tables, patient and purchase inputs,
// request schemas, and the predictor abstraction.
//
// Rules for this layer:
//   - NO file I/O or network calls
//   - NO model-fitting code
//   - Only data types, validation rules and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// A CSV file as header + untyped rows
pub mod table;

/// Declarative request schemas and field validation
pub mod schema;

/// Alzheimer's risk features, request and answer types
pub mod patient;

/// Purchase-amount features and request type
pub mod purchase;

/// Core abstractions (traits) that other layers implement
pub mod traits;
