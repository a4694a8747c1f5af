// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns that don't belong in any
// specific business layer:
//
//   checkpoint.rs - Interchange-format model persistence.
//                   Uses Burn's CompactRecorder to serialise
//                   model parameters to disk, plus the
//                   TrainConfig as JSON so a run can be
//                   reconstructed exactly.
//
//   exporter.rs   - Deployment-format conversion.
//                   Turns a fitted model into the bundle the
//                   client-side calculator loads (model.json
//                   topology/manifest plus a binary weight
//                   shard), validates a bundle's structure,
//                   and loads one back for prediction.
//
//   metrics.rs    - Training metrics logging.
//                   Writes epoch-level metrics (loss, MAE)
//                   to a CSV file for later analysis.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here
//   prevents duplication and makes the on-disk formats
//   easy to find in one place.

/// Interchange-format model saving and loading
pub mod checkpoint;

/// Deployment bundle writer, validator and loader
pub mod exporter;

/// Training metrics CSV logger
pub mod metrics;
