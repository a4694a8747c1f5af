// ============================================================
// Layer 4 - Arithmetic Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of samples
// into tensors the model can consume.
//
// How batching works here:
//   Input:  Vec of N ArithmeticSamples
//   Output: inputs  tensor of shape [N, 2]
//           targets tensor of shape [N, 1]
//
//   We flatten all operand pairs into one long Vec, then
//   reshape: [s1_a, s1_b, s2_a, s2_b, ...] → [N, 2].
//
// The target gets an explicit trailing dimension of 1 so it
// matches the model's output shape for the MSE loss.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::ArithmeticSample;

// ─── ArithmeticBatch ──────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
///
/// B is the Burn Backend (e.g. NdArray, Autodiff<NdArray>),
/// generic so the same batcher serves training and validation.
#[derive(Debug, Clone)]
pub struct ArithmeticBatch<B: Backend> {
    /// Operand pairs, shape: [batch_size, 2]
    pub inputs: Tensor<B, 2>,

    /// True labels, shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

// ─── ArithmeticBatcher ────────────────────────────────────────────────────────
/// Stateless batcher. The data loader hands the target device
/// to every `batch` call, so there is nothing to hold on to.
#[derive(Clone, Debug, Default)]
pub struct ArithmeticBatcher;

impl ArithmeticBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, ArithmeticSample, ArithmeticBatch<B>> for ArithmeticBatcher {
    fn batch(&self, items: Vec<ArithmeticSample>, device: &B::Device) -> ArithmeticBatch<B> {
        let batch_size = items.len();

        let inputs_flat: Vec<f32> = items.iter().flat_map(|s| s.inputs).collect();
        let targets_flat: Vec<f32> = items.iter().map(|s| s.label).collect();

        let inputs =
            Tensor::<B, 1>::from_floats(inputs_flat.as_slice(), device).reshape([batch_size, 2]);

        let targets =
            Tensor::<B, 1>::from_floats(targets_flat.as_slice(), device).reshape([batch_size, 1]);

        ArithmeticBatch { inputs, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batcher = ArithmeticBatcher::new();
        let items = vec![
            ArithmeticSample::new(1.0, 2.0, 3.0),
            ArithmeticSample::new(4.0, 5.0, 9.0),
            ArithmeticSample::new(-1.0, 1.0, 0.0),
        ];
        let batch: ArithmeticBatch<TestBackend> = batcher.batch(items, &device);
        assert_eq!(batch.inputs.dims(), [3, 2]);
        assert_eq!(batch.targets.dims(), [3, 1]);
    }

    #[test]
    fn test_batch_preserves_values() {
        let device = Default::default();
        let batcher = ArithmeticBatcher::new();
        let batch: ArithmeticBatch<TestBackend> =
            batcher.batch(vec![ArithmeticSample::new(10.0, 5.0, 15.0)], &device);

        let inputs: Vec<f32> = batch.inputs.into_data().to_vec().unwrap();
        let targets: Vec<f32> = batch.targets.into_data().to_vec().unwrap();
        assert_eq!(inputs, vec![10.0, 5.0]);
        assert_eq!(targets, vec![15.0]);
    }
}
