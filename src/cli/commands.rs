// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::domain::operation::Operation;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train and export the arithmetic models
    Train(TrainArgs),

    /// Predict one result from a previously exported bundle
    Predict(PredictArgs),
}

/// CLI-side mirror of the domain Operation, so clap types never
/// leak past this layer.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OperationArg {
    /// Train the a + b model
    Sum,
    /// Train the a - b model
    Difference,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Sum => Operation::Sum,
            OperationArg::Difference => Operation::Difference,
        }
    }
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Which model to train; omit to train both (sum first,
    /// then difference)
    #[arg(long, value_enum)]
    pub operation: Option<OperationArg>,

    /// Root directory for the exported deployment bundles
    #[arg(long, default_value = "public")]
    pub out_dir: String,

    /// Directory for interchange artifacts, configs and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of synthetic samples to generate per model
    #[arg(long, default_value_t = 10_000)]
    pub samples: usize,

    /// Lower bound of the uniform input range (inclusive)
    #[arg(long, default_value_t = -100.0, allow_negative_numbers = true)]
    pub input_min: f32,

    /// Upper bound of the uniform input range (exclusive)
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub input_max: f32,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// How fast the model learns; too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of samples withheld from gradient updates and
    /// used only to monitor generalisation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Seed for dataset generation and shuffling; the same seed
    /// reproduces the same dataset byte for byte
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Width of the first hidden layer
    #[arg(long, default_value_t = 64)]
    pub hidden_1: usize,

    /// Width of the second hidden layer
    #[arg(long, default_value_t = 32)]
    pub hidden_2: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2; the
/// application layer never sees clap types.
impl From<&TrainArgs> for TrainConfig {
    fn from(a: &TrainArgs) -> Self {
        TrainConfig {
            out_dir: a.out_dir.clone(),
            checkpoint_dir: a.checkpoint_dir.clone(),
            samples: a.samples,
            input_min: a.input_min,
            input_max: a.input_max,
            epochs: a.epochs,
            batch_size: a.batch_size,
            lr: a.lr,
            val_fraction: a.val_fraction,
            seed: a.seed,
            hidden_1: a.hidden_1,
            hidden_2: a.hidden_2,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory of the exported bundle to load
    #[arg(long, default_value = "public/sum_model")]
    pub model_dir: String,

    /// First operand
    #[arg(long, allow_negative_numbers = true)]
    pub a: f32,

    /// Second operand
    #[arg(long, allow_negative_numbers = true)]
    pub b: f32,
}
