// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by both the training job and the
// prediction service:
//
//   artifact.rs — Saving and loading a fitted model
//                 One versioned JSON file per model. Training
//                 writes it, serving reads it once at startup.
//
//   metrics.rs  — Held-out evaluation
//                 Confusion matrix for the classifier,
//                 MAE / RMSE / R² for the regressor.
//
//   chart.rs    — The /comparison bar chart
//                 Renders an SVG with plotters into the
//                 static directory.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Versioned JSON model artifact
pub mod artifact;

/// Confusion matrix and regression scores
pub mod metrics;

/// SVG bar chart of the baseline values
pub mod chart;
