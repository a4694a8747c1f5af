// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`   - generates data, fits the model(s), exports
//                  the deployment bundle(s)
//   2. `predict` - loads an exported bundle and predicts for
//                  one operand pair
//
// Running with no subcommand at all trains both models with
// default settings, sum first and then difference, matching
// the behaviour of a bare invocation.

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::train_use_case::TrainConfig;
use crate::domain::operation::Operation;
use crate::infra::exporter::{MODEL_JSON, WEIGHTS_SHARD};

/// The main CLI struct; clap reads the fields and generates
/// argument parsing code automatically via the Parser derive.
#[derive(Parser, Debug)]
#[command(
    name = "arith-ops-trainer",
    version,
    about = "Train small regression models for addition and subtraction, \
             then export them as web-deployable bundles."
)]
pub struct Cli {
    /// The subcommand to run; absent means "train everything"
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. This keeps the CLI layer thin: it only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Some(Commands::Train(args)) => Self::run_train(args),
            Some(Commands::Predict(args)) => Self::run_predict(args),
            None => Self::run_train_defaults(),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        let operations: Vec<Operation> = match args.operation {
            Some(op) => vec![op.into()],
            None => Operation::ALL.to_vec(),
        };
        let config = TrainConfig::from(&args);
        Self::train(config, &operations)
    }

    /// A bare invocation: both models, default settings.
    fn run_train_defaults() -> Result<()> {
        Self::train(TrainConfig::default(), &Operation::ALL)
    }

    fn train(config: TrainConfig, operations: &[Operation]) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!(
            "Training {} model(s), bundles go to '{}'",
            operations.len(),
            config.out_dir
        );

        let out_dir = config.out_dir.clone();
        let use_case = TrainUseCase::new(config);
        use_case.execute(operations)?;

        println!("\nTraining complete. Files created:");
        for op in operations {
            println!("   {}/{}/", out_dir, op.model_name());
            println!("   ├── {MODEL_JSON}");
            println!("   └── {WEIGHTS_SHARD}");
        }
        Ok(())
    }

    /// Handles the `predict` subcommand.
    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(&args.model_dir)?;
        let predicted = use_case.predict(args.a, args.b)?;
        println!("\nPrediction: {predicted:.2}");
        Ok(())
    }
}
