use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One labelled observation: two input scalars and the value the
/// selected operator produces for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticSample {
    /// The two independent operands, drawn uniformly from the
    /// configured range.
    pub inputs: [f32; 2],

    /// Exactly `operation.apply(inputs[0], inputs[1])`.
    pub label: f32,
}

impl ArithmeticSample {
    pub fn new(a: f32, b: f32, label: f32) -> Self {
        Self {
            inputs: [a, b],
            label,
        }
    }
}

pub struct ArithmeticDataset {
    samples: Vec<ArithmeticSample>,
}

impl ArithmeticDataset {
    pub fn new(samples: Vec<ArithmeticSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<ArithmeticSample> for ArithmeticDataset {
    fn get(&self, index: usize) -> Option<ArithmeticSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
