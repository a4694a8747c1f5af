// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Loads a previously exported deployment bundle and predicts
// the result for one operand pair. This is the same artifact
// the client-side calculator consumes, so a prediction here
// is exactly what the web application would show.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::infra::exporter::BundleModel;

pub struct PredictUseCase {
    model: BundleModel,
}

impl PredictUseCase {
    /// Load (and structurally validate) the bundle in `model_dir`.
    pub fn new(model_dir: impl Into<PathBuf>) -> Result<Self> {
        let model_dir = model_dir.into();
        let model = BundleModel::load(&model_dir).with_context(|| {
            format!(
                "cannot load model bundle from '{}'. Have you run 'train' first?",
                model_dir.display()
            )
        })?;
        tracing::info!("Loaded model bundle from '{}'", model_dir.display());
        Ok(Self { model })
    }

    /// Run the bundle's forward pass on one pair.
    pub fn predict(&self, a: f32, b: f32) -> Result<f32> {
        self.model.predict_pair(a, b)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::exporter::{export_bundle, Activation, LayerWeights};

    #[test]
    fn test_predicts_from_exported_bundle() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("sum_model");

        // A bundle that computes a + b + 0.5 for positive inputs
        let layers = vec![
            LayerWeights {
                name: "hidden_1".to_string(),
                kernel: vec![1.0, 0.0, 0.0, 1.0],
                bias: vec![0.0, 0.0],
                input_dim: 2,
                units: 2,
                activation: Activation::Relu,
            },
            LayerWeights {
                name: "output".to_string(),
                kernel: vec![1.0, 1.0],
                bias: vec![0.5],
                input_dim: 2,
                units: 1,
                activation: Activation::Linear,
            },
        ];
        export_bundle(&layers, "sum_model", &dir).unwrap();

        let use_case = PredictUseCase::new(&dir).unwrap();
        assert_eq!(use_case.predict(10.0, 5.0).unwrap(), 15.5);
    }

    #[test]
    fn test_missing_bundle_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(PredictUseCase::new(tmp.path().join("nope")).is_err());
    }
}
