use anyhow::Result;
use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::infra::exporter::{Activation, LayerWeights};

/// Two operand scalars in, one predicted scalar out.
pub const INPUT_DIM: usize = 2;
pub const OUTPUT_DIM: usize = 1;

#[derive(Config, Debug)]
pub struct RegressorConfig {
    /// Width of the first hidden layer
    #[config(default = 64)]
    pub hidden_1: usize,
    /// Width of the second hidden layer
    #[config(default = 32)]
    pub hidden_2: usize,
}

impl RegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RegressorModel<B> {
        RegressorModel {
            input_layer: LinearConfig::new(INPUT_DIM, self.hidden_1).init(device),
            hidden_layer: LinearConfig::new(self.hidden_1, self.hidden_2).init(device),
            output_layer: LinearConfig::new(self.hidden_2, OUTPUT_DIM).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct RegressorModel<B: Backend> {
    pub input_layer: Linear<B>,
    pub hidden_layer: Linear<B>,
    pub output_layer: Linear<B>,
}

impl<B: Backend> RegressorModel<B> {
    /// inputs: [batch, 2] → predictions: [batch, 1]
    pub fn forward(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.input_layer.forward(inputs));
        let x = relu(self.hidden_layer.forward(x));
        self.output_layer.forward(x)
    }

    /// Forward pass plus mean squared error against the targets.
    /// Returns (loss, predictions) so callers can derive further
    /// metrics from the same forward pass.
    pub fn forward_loss(
        &self,
        inputs: Tensor<B, 2>,
        targets: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let predictions = self.forward(inputs);
        let loss = MseLoss::new().forward(predictions.clone(), targets, Reduction::Mean);
        (loss, predictions)
    }

    /// Predict for a single literal operand pair.
    pub fn predict_pair(&self, a: f32, b: f32, device: &B::Device) -> f32 {
        let input = Tensor::<B, 1>::from_floats([a, b].as_slice(), device).reshape([1, 2]);
        self.forward(input).into_scalar().elem::<f32>()
    }

    /// Extract every layer's kernel and bias as plain f32 vectors,
    /// in forward order, for conversion into the deployment bundle.
    pub fn export_weights(&self) -> Result<Vec<LayerWeights>> {
        Ok(vec![
            dense_weights("hidden_1", &self.input_layer, Activation::Relu)?,
            dense_weights("hidden_2", &self.hidden_layer, Activation::Relu)?,
            dense_weights("output", &self.output_layer, Activation::Linear)?,
        ])
    }
}

/// Pull one Linear layer's parameters off the backend.
/// Burn stores the kernel as [d_input, d_output] row-major, which
/// is exactly the layout the bundle format expects.
fn dense_weights<B: Backend>(
    name: &str,
    layer: &Linear<B>,
    activation: Activation,
) -> Result<LayerWeights> {
    let weight = layer.weight.val();
    let [input_dim, units] = weight.dims();

    let kernel: Vec<f32> = weight
        .into_data()
        .to_vec()
        .map_err(|e| anyhow::anyhow!("reading kernel tensor for '{name}': {e:?}"))?;

    let bias: Vec<f32> = match &layer.bias {
        Some(bias) => bias
            .val()
            .into_data()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("reading bias tensor for '{name}': {e:?}"))?,
        None => vec![0.0; units],
    };

    Ok(LayerWeights {
        name: name.to_string(),
        kernel,
        bias,
        input_dim,
        units,
        activation,
    })
}
