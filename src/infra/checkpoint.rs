// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Persists the fitted model in the interchange format using
// Burn's CompactRecorder.
//
// What gets saved per model:
//   1. Model weights  ({name}.mpk)         - all learned parameters
//   2. Train config   ({name}_config.json) - the full run configuration
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Type-safe: loading fails if the architecture doesn't match
//
// The weights file is transient by design: once the deployment
// bundle has been written and validated, the pipeline removes
// it. The config JSON stays behind as the record of the run.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use std::{fs, path::PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::RegressorModel;

/// Manages the interchange-format artifacts for trained models.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file CompactRecorder actually writes for `name`.
    /// The recorder appends its own ".mpk" extension to the
    /// base path it is given, so cleanup must target this path.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.mpk"))
    }

    /// Serialise a fitted model's weights. Returns the path of
    /// the written interchange file.
    pub fn save_model<B: AutodiffBackend>(
        &self,
        model: &RegressorModel<B>,
        name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", self.dir.display())
        })?;

        let base = self.dir.join(name);
        CompactRecorder::new()
            .record(model.clone().into_record(), base.clone())
            .with_context(|| format!("Failed to save model weights to '{}'", base.display()))?;

        let path = self.record_path(name);
        tracing::debug!("Saved interchange artifact: '{}'", path.display());
        Ok(path)
    }

    /// Restore weights into a freshly built model of the same
    /// architecture. Returns the model with the loaded weights.
    pub fn load_model<B: Backend>(
        &self,
        model: RegressorModel<B>,
        name: &str,
        device: &B::Device,
    ) -> Result<RegressorModel<B>> {
        let base = self.dir.join(name);
        let record = CompactRecorder::new()
            .load(base.clone(), device)
            .with_context(|| format!("Cannot load model weights from '{}'", base.display()))?;
        Ok(model.load_record(record))
    }

    /// Persist the full run configuration next to the weights so
    /// the run is reconstructible after the fact.
    pub fn save_config(&self, cfg: &TrainConfig, name: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create checkpoint directory '{}'", self.dir.display())
        })?;

        let path = self.dir.join(format!("{name}_config.json"));
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Read a previously saved run configuration.
    pub fn load_config(&self, name: &str) -> Result<TrainConfig> {
        let path = self.dir.join(format!("{name}_config.json"));
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::RegressorConfig;
    use crate::ml::trainer::{EvalBackend, TrainBackend};
    use burn::module::AutodiffModule;

    #[test]
    fn test_config_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path());

        let cfg = TrainConfig::default();
        manager.save_config(&cfg, "sum_model").unwrap();
        let loaded = manager.load_config("sum_model").unwrap();

        assert_eq!(loaded.samples, cfg.samples);
        assert_eq!(loaded.seed, cfg.seed);
        assert_eq!(loaded.epochs, cfg.epochs);
    }

    #[test]
    fn test_weights_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path());
        let device = Default::default();

        let model: RegressorModel<TrainBackend> = RegressorConfig::new().init(&device);
        let saved_path = manager.save_model(&model, "sum_model").unwrap();
        assert!(saved_path.exists());
        assert_eq!(saved_path.extension().unwrap(), "mpk");

        let fresh: RegressorModel<EvalBackend> = RegressorConfig::new().init(&device);
        let restored = manager.load_model(fresh, "sum_model", &device).unwrap();

        // Same weights must produce the same prediction
        let original = model.valid().predict_pair(10.0, 5.0, &device);
        let reloaded = restored.predict_pair(10.0, 5.0, &device);
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(tmp.path());
        let device = Default::default();
        let fresh: RegressorModel<EvalBackend> = RegressorConfig::new().init(&device);
        assert!(manager.load_model(fresh, "never_trained", &device).is_err());
    }
}
