// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal at a time (train a model, answer a prediction).
//
// Rules for this layer:
//   - No tree-growing or scoring math here (that's Layer 5)
//   - No HTTP or terminal output here (Layers 1 and api)
//   - No direct file parsing (that's Layers 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Risk classifier training workflow
pub mod train_use_case;

// Purchase regressor training workflow
pub mod regressor_use_case;

// Validate → assemble → predict → respond
pub mod predict_use_case;
