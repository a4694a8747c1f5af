// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from a random seed to model-ready tensor batches.
//
// The pipeline flows in this order:
//
//   seed + range + operator
//       │
//       ▼
//   SampleGenerator   → draws uniform input pairs, derives labels
//       │
//       ▼
//   split_train_val   → shuffles, holds out a validation fraction
//       │
//       ▼
//   ArithmeticDataset → implements Burn's Dataset trait
//       │
//       ▼
//   ArithmeticBatcher → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.

/// Draws seeded synthetic (pair, label) samples
pub mod generator;

/// Sample type and Burn's Dataset trait implementation
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
