// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application)
// and the HTTP service (api).
//
// Four commands are supported:
//   1. `train`           — fits the risk classifier on a CSV
//   2. `train-regressor` — fits the purchase regressor on a CSV
//   3. `serve`           — serves a trained artifact over HTTP
//   4. `predict`         — scores one JSON record offline
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, RegressorArgs, ServeArgs, TrainArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "risk-forest",
    version,
    about = "Train random-forest risk and purchase models on CSV data, then serve predictions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)          => run_train(args),
            Commands::TrainRegressor(args) => run_train_regressor(args),
            Commands::Serve(args)          => run_serve(args),
            Commands::Predict(args)        => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.data.display());
    let report = TrainUseCase::new(args.into()).execute()?;

    println!("\nConfusion matrix (rows = actual, columns = predicted):");
    println!("classes: {:?}", report.confusion.classes());
    println!("{}", report.confusion);
    println!(
        "Accuracy: {:.4}  ({} train / {} test rows)",
        report.confusion.accuracy(),
        report.n_train,
        report.n_test
    );
    println!("Model saved to '{}'", report.artifact_path.display());
    Ok(())
}

fn run_train_regressor(args: RegressorArgs) -> Result<()> {
    use crate::application::regressor_use_case::RegressorUseCase;

    tracing::info!("Starting regressor training on '{}'", args.data.display());
    let report = RegressorUseCase::new(args.into()).execute()?;

    println!("\nHeld-out: {}", report.metrics);
    println!("({} train / {} test rows)", report.n_train, report.n_test);
    println!("Model saved to '{}'", report.artifact_path.display());
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::api::PredictionServer;

    // The model is loaded before the runtime starts listening
    let server = PredictionServer::new(args.into())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot start async runtime")?;
    runtime.block_on(server.run())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::{PredictError, PredictUseCase};
    use crate::infra::artifact::ArtifactStore;

    let body: serde_json::Value =
        serde_json::from_str(&args.input).context("--input is not valid JSON")?;
    let use_case = PredictUseCase::from_artifact(&ArtifactStore::new(&args.artifact))?;

    match use_case.predict_json(&body) {
        Ok(response) => {
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Err(PredictError::Invalid(violations)) => {
            for v in &violations {
                eprintln!("  {}: {}", v.field, v.message);
            }
            anyhow::bail!("input failed validation ({} field(s))", violations.len())
        }
        Err(PredictError::Inference(e)) => Err(e.context("Prediction failed")),
    }
}
