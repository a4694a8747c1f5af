// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn framework specific code for the
// regression model and its training loop.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - The model architecture is clearly separated from
//     data generation and application logic
//
// What's in this layer:
//
//   model.rs   - The feed-forward regressor
//                Two scalar inputs, a 64-wide and a 32-wide
//                hidden layer (both relu), one linear output.
//                Also extracts per-layer weights for export.
//
//   trainer.rs - The training loop
//                Forward pass, MSE loss, MAE tracking,
//                backward pass, Adam step, validation pass
//                and per-epoch metrics logging.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Kingma & Ba (2015) Adam

/// Feed-forward regression model architecture
pub mod model;

/// Full training loop with validation and metrics
pub mod trainer;
