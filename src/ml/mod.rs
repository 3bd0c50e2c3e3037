// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All model-fitting and scoring code lives here. No other layer
// names smartcore or knows how a forest votes.
//
//   forest.rs     — RandomForestClassifier / RandomForestRegressor
//                   adapters over smartcore's ensembles, carrying
//                   feature names, class names and parameters
//
//   trainer.rs    — fit on the train partition, score the
//                   held-out partition
//
//   inferencer.rs — wraps a loaded artifact and answers
//                   validated prediction requests
//
// Reference: smartcore documentation
//            Breiman (2001) Random Forests

/// Random forest classifier and regressor
pub mod forest;

/// Fit + held-out evaluation
pub mod trainer;

/// Artifact-backed prediction engine
pub mod inferencer;
