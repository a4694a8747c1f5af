// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Why log metrics to CSV?
//   - Easy to open in a spreadsheet
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average MSE over training batches
//   - train_mae:  average absolute error over training batches
//   - val_loss:   average MSE on the held-out validation set
//   - val_mae:    average absolute error on the validation set
//
// Output file: {checkpoint_dir}/{model}_metrics.csv
//
// How to read the metrics:
//   - Loss should decrease each epoch (the model is learning)
//   - If val_loss rises while train_loss falls, it is overfitting
//   - val_mae is the honest error estimate: it is computed on
//     samples the optimiser never saw

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average mean squared error over all training batches
    pub train_loss: f64,

    /// Average mean absolute error over all training batches
    pub train_mae: f64,

    /// Average mean squared error on the validation set
    pub val_loss: f64,

    /// Average mean absolute error on the validation set
    pub val_mae: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_mae: f64, val_loss: f64, val_mae: f64) -> Self {
        Self {
            epoch,
            train_loss,
            train_mae,
            val_loss,
            val_mae,
        }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a logger for one model's metrics file.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>, model_name: &str) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join(format!("{model_name}_metrics.csv"));

        // Header only once; later runs append below it
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_mae,val_loss,val_mae")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_mae, m.val_loss, m.val_mae,
        )?;

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 1.1, 2.3, 1.0);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let tmp = tempfile::tempdir().unwrap();

        let logger = MetricsLogger::new(tmp.path(), "sum_model").unwrap();
        logger.log(&EpochMetrics::new(1, 3.0, 1.5, 3.1, 1.6)).unwrap();

        // Re-opening must not rewrite the header
        let logger = MetricsLogger::new(tmp.path(), "sum_model").unwrap();
        logger.log(&EpochMetrics::new(2, 2.0, 1.0, 2.1, 1.1)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,train_mae,val_loss,val_mae");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));
    }
}
