// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a CSV file on disk and a numeric dataset
// ready for fitting:
//
//   CSV file
//       │
//       ▼
//   CsvLoader        → header + string rows (RawTable)
//       │
//       ▼
//   drop / select    → identifier columns removed, features kept
//       │
//       ▼
//   encoder          → label → class codes, Gender → Gender_Male
//       │
//       ▼
//   Dataset<T>       → row-major f64 matrix + targets
//       │
//       ▼
//   splitter         → seeded train / test index partitions
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Reads a CSV file into a RawTable using the csv crate
pub mod loader;

/// Label categorisation and indicator (one-hot) columns
pub mod encoder;

/// Typed feature matrix + targets
pub mod dataset;

/// Seeded shuffle and stratified train/test splits
pub mod splitter;
