// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (training + exporting, or predicting).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination
//
// Think of this layer as the "director": it tells other
// layers what to do but doesn't do the work itself.

// The train-and-export workflow, run once per operator
pub mod train_use_case;

// Loads an exported bundle and predicts for one pair
pub mod predict_use_case;
