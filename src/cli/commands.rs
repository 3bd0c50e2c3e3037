// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their flags:
//
//   train            — fit the Alzheimer's risk classifier
//   train-regressor  — fit the purchase-amount regressor
//   serve            — run the HTTP prediction service
//   predict          — score one JSON record offline
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::api::ServeConfig;
use crate::application::regressor_use_case::RegressorConfig;
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the Alzheimer's risk classifier on a patient CSV
    Train(TrainArgs),

    /// Train the purchase-amount regressor on a transactions CSV
    TrainRegressor(RegressorArgs),

    /// Serve predictions over HTTP from a trained artifact
    Serve(ServeArgs),

    /// Predict one JSON record with a trained artifact
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Patient CSV with a header row and a Diagnosis column
    #[arg(long, default_value = "alzheimers_disease_data.csv")]
    pub data: PathBuf,

    /// Where to write the fitted model (overwritten)
    #[arg(long, default_value = "rf_model_tuned5.json")]
    pub artifact: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.3)]
    pub test_size: f64,

    /// Seed for both the split and the forest
    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Features examined at each split
    #[arg(long, default_value_t = 3)]
    pub max_features: usize,

    /// Maximum tree depth (unbounded when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,

    #[arg(long, default_value_t = 2)]
    pub min_samples_split: usize,

    #[arg(long, default_value_t = 1)]
    pub min_samples_leaf: usize,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:         a.data,
            artifact_path:     a.artifact,
            test_fraction:     a.test_size,
            seed:              a.seed,
            n_estimators:      a.n_estimators,
            max_features:      a.max_features,
            max_depth:         a.max_depth,
            min_samples_split: a.min_samples_split,
            min_samples_leaf:  a.min_samples_leaf,
        }
    }
}

/// All arguments for the `train-regressor` command.
#[derive(Args, Debug)]
pub struct RegressorArgs {
    /// Transactions CSV with Age, Gender and the target column
    #[arg(long, default_value = "ecommerce_transactions.csv")]
    pub data: PathBuf,

    #[arg(long, default_value = "purchase_predictor_model.json")]
    pub artifact: PathBuf,

    /// Continuous column to predict
    #[arg(long, default_value = "PurchaseAmount")]
    pub target: String,

    #[arg(long, default_value_t = 0.3)]
    pub test_size: f64,

    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl From<RegressorArgs> for RegressorConfig {
    fn from(a: RegressorArgs) -> Self {
        RegressorConfig {
            data_path:     a.data,
            artifact_path: a.artifact,
            target:        a.target,
            test_fraction: a.test_size,
            seed:          a.seed,
            n_estimators:  a.n_estimators,
            max_depth:     a.max_depth,
        }
    }
}

/// All arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Trained model to serve; its kind selects the API variant
    #[arg(long, default_value = "rf_model_tuned5.json")]
    pub artifact: PathBuf,

    /// Directory behind /static (the comparison chart is written here)
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Allow cross-origin requests from any origin
    #[arg(long)]
    pub cors: bool,
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            host:          a.host,
            port:          a.port,
            artifact_path: a.artifact,
            static_dir:    a.static_dir,
            cors_enabled:  a.cors,
        }
    }
}

/// All arguments for the `predict` command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The record to score, as a JSON object
    #[arg(long)]
    pub input: String,

    #[arg(long, default_value = "rf_model_tuned5.json")]
    pub artifact: PathBuf,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use crate::cli::Cli;
    use crate::cli::commands::Commands;
    use clap::Parser;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["risk-forest", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: crate::application::train_use_case::TrainConfig = args.into();
        assert_eq!(cfg.test_fraction, 0.3);
        assert_eq!(cfg.seed, 123);
        assert_eq!(cfg.n_estimators, 100);
        assert_eq!(cfg.max_features, 3);
        assert_eq!(cfg.artifact_path.to_str(), Some("rf_model_tuned5.json"));
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "risk-forest", "serve", "--port", "9001", "--artifact", "m.json", "--cors",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else { panic!("expected serve") };
        let cfg: crate::api::ServeConfig = args.into();
        assert_eq!(cfg.port, 9001);
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.address(), format!("{}:9001", cfg.host));
    }

    #[test]
    fn test_train_regressor_target_flag() {
        let cli = Cli::try_parse_from(["risk-forest", "train-regressor", "--target", "Spend"]).unwrap();
        let Commands::TrainRegressor(args) = cli.command else { panic!("expected train-regressor") };
        assert_eq!(args.target, "Spend");
    }
}
