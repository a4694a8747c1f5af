// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Backend note:
//   - Training runs on Autodiff<NdArray> for gradients
//   - model.valid() returns the model on NdArray
//   - The validation batcher must also use NdArray
//   The models here are tiny (2 → 64 → 32 → 1), so a CPU
//   backend is both sufficient and deterministic.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ArithmeticBatcher, dataset::ArithmeticDataset};
use crate::domain::operation::Operation;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{RegressorConfig, RegressorModel};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type EvalBackend = burn::backend::NdArray;

/// Mean absolute error between predictions and targets, as one scalar.
pub fn mean_absolute_error<B: Backend>(predictions: Tensor<B, 2>, targets: Tensor<B, 2>) -> f64 {
    (predictions - targets).abs().mean().into_scalar().elem::<f64>()
}

/// Fit a fresh regressor on the given datasets and return it.
/// One row of metrics is appended to `metrics` per epoch.
pub fn run_training(
    cfg: &TrainConfig,
    operation: Operation,
    train_dataset: ArithmeticDataset,
    val_dataset: ArithmeticDataset,
    metrics: &MetricsLogger,
) -> Result<RegressorModel<TrainBackend>> {
    let device = burn::backend::ndarray::NdArrayDevice::default();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = RegressorConfig::new()
        .with_hidden_1(cfg.hidden_1)
        .with_hidden_2(cfg.hidden_2);
    let mut model: RegressorModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready for {}: 2 → {} → {} → 1",
        operation,
        cfg.hidden_1,
        cfg.hidden_2
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ArithmeticBatcher::new())
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (inner backend, no autodiff overhead) ──────────
    let val_loader = DataLoaderBuilder::new(ArithmeticBatcher::new())
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut best_val_loss = f64::INFINITY;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_mae_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter() {
            let (loss, predictions) = model.forward_loss(batch.inputs, batch.targets.clone());

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_mae_sum += mean_absolute_error(predictions, batch.targets);
            train_batches += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };
        let avg_train_mae = if train_batches > 0 {
            train_mae_sum / train_batches as f64
        } else {
            f64::NAN
        };

        if !avg_train_loss.is_finite() {
            bail!("training loss went non-finite at epoch {epoch} (lr too high?)");
        }

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → RegressorModel<EvalBackend>
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_mae_sum = 0.0f64;
        let mut val_batches = 0usize;

        for batch in val_loader.iter() {
            let (loss, predictions) = model_valid.forward_loss(batch.inputs, batch.targets.clone());
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_mae_sum += mean_absolute_error(predictions, batch.targets);
            val_batches += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else {
            f64::NAN
        };
        let avg_val_mae = if val_batches > 0 {
            val_mae_sum / val_batches as f64
        } else {
            f64::NAN
        };

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_mae={:.4} | val_loss={:.4} | val_mae={:.4}",
            epoch, cfg.epochs, avg_train_loss, avg_train_mae, avg_val_loss, avg_val_mae,
        );

        let row = EpochMetrics::new(epoch, avg_train_loss, avg_train_mae, avg_val_loss, avg_val_mae);
        if row.is_improvement(best_val_loss) {
            best_val_loss = row.val_loss;
            tracing::debug!("New best validation loss: {:.6}", best_val_loss);
        }
        metrics.log(&row)?;
    }

    tracing::info!("Training complete for the {} model", operation);
    Ok(model)
}
