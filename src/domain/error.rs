// ============================================================
// Layer 3 - Pipeline Error Taxonomy
// ============================================================
// A closed set of failure stages instead of one opaque
// catch-all. Every error that escapes the training pipeline
// names the operation being trained and the stage that broke,
// so a failure can be localised from the message alone:
//
//   "conversion failed for the sum model: missing weight
//    shard 'group1-shard1of1.bin'"
//
// The underlying cause is preserved as an error source, so
// `anyhow` still prints the full chain at the top level.

use crate::domain::operation::Operation;
use std::fmt;

/// The stages of the train-and-export pipeline that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Drawing the synthetic dataset
    DataGeneration,
    /// The training loop itself
    Fit,
    /// Post-fit metric computation and spot checks
    Evaluation,
    /// Writing the interchange artifact or the config JSON
    Serialization,
    /// Producing or validating the deployment bundle
    Conversion,
    /// Directory creation and artifact cleanup
    Filesystem,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::DataGeneration => "data generation",
            Stage::Fit => "fitting",
            Stage::Evaluation => "evaluation",
            Stage::Serialization => "serialization",
            Stage::Conversion => "conversion",
            Stage::Filesystem => "filesystem operation",
        };
        write!(f, "{name}")
    }
}

/// A pipeline failure with enough context to localise the fault.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed for the {operation} model")]
pub struct PipelineError {
    pub operation: Operation,
    pub stage: Stage,
    #[source]
    source: anyhow::Error,
}

impl PipelineError {
    pub fn new(operation: Operation, stage: Stage, source: anyhow::Error) -> Self {
        Self {
            operation,
            stage,
            source,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_operation_and_stage() {
        let err = PipelineError::new(
            Operation::Sum,
            Stage::Conversion,
            anyhow::anyhow!("missing weight shard"),
        );
        let msg = err.to_string();
        assert!(msg.contains("sum"));
        assert!(msg.contains("conversion"));
    }

    #[test]
    fn test_cause_is_preserved() {
        use std::error::Error;
        let err = PipelineError::new(
            Operation::Difference,
            Stage::Fit,
            anyhow::anyhow!("loss went non-finite"),
        );
        let source = err.source().expect("source must be kept");
        assert!(source.to_string().contains("non-finite"));
    }
}
