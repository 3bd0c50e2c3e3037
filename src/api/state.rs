// ============================================================
// Layer 1 — Shared Handler State
// ============================================================
// Cloned into every handler. The model sits behind an Arc
// inside PredictUseCase and is never mutated, so no locks.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::predict_use_case::PredictUseCase;

#[derive(Clone)]
pub struct AppState {
    pub predictor:  PredictUseCase,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(predictor: PredictUseCase, static_dir: PathBuf) -> Self {
        Self { predictor, static_dir: Arc::new(static_dir) }
    }
}
