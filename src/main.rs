//! demand-forecast CLI
//!
//! Two batch entry points:
//!
//! - `train`: enrich the sales history, summarize it, fit the linear
//!   baseline and the random forest, persist the forest and its metrics
//! - `predict`: load the persisted forest, enrich new data the same way and
//!   export it with a `sales_predicted` column
//!
//! Every flag falls back to a `FORECAST_*` environment variable and then to
//! the built-in default. Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pipeline::{PipelineConfig, run_prediction, run_training};
use tracing::info;
use types::DatePolicy;

#[derive(Parser)]
#[command(name = "demand-forecast")]
#[command(about = "Retail demand forecasting with holiday and promotion features")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both models on the sales history and persist the forest
    Train {
        #[command(flatten)]
        common: CommonArgs,

        /// Training metrics report (JSON)
        #[arg(long, env = "FORECAST_METRICS")]
        metrics: Option<PathBuf>,

        /// EDA summary (JSON)
        #[arg(long, env = "FORECAST_EDA")]
        eda: Option<PathBuf>,

        /// Trees in the random forest
        #[arg(long, env = "FORECAST_N_TREES")]
        n_trees: Option<usize>,

        /// Share of rows held out for evaluation
        #[arg(long, env = "FORECAST_TEST_FRACTION")]
        test_fraction: Option<f64>,
    },
    /// Predict sales for a dataset with the persisted model
    Predict {
        #[command(flatten)]
        common: CommonArgs,

        /// Prediction output CSV
        #[arg(short, long, env = "FORECAST_OUTPUT")]
        output: Option<PathBuf>,
    },
}

/// Flags shared by both runs. Enrichment settings must match between them.
#[derive(Args)]
struct CommonArgs {
    /// Input CSV
    #[arg(short, long, env = "FORECAST_INPUT")]
    input: Option<PathBuf>,

    /// Model artifact path
    #[arg(short, long, env = "FORECAST_MODEL")]
    model: Option<PathBuf>,

    /// Seed for promotion synthesis, the split and the forest
    #[arg(long, env = "FORECAST_SEED")]
    seed: Option<u64>,

    /// Probability of a synthesized promotion day
    #[arg(long, env = "FORECAST_PROMOTION_PROBABILITY")]
    promotion_probability: Option<f64>,

    /// Sales multiplier on promotion days
    #[arg(long, env = "FORECAST_UPLIFT")]
    uplift: Option<f64>,

    /// Fail on the first unparseable date instead of dropping the row
    #[arg(long, env = "FORECAST_STRICT_DATES")]
    strict_dates: bool,

    /// Also export the feature table as Parquet
    #[arg(long, env = "FORECAST_PARQUET")]
    parquet: Option<PathBuf>,
}

impl CommonArgs {
    fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(path) = self.input {
            config = config.with_input_path(path);
        }
        if let Some(path) = self.model {
            config = config.with_artifact_path(path);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(p) = self.promotion_probability {
            config = config.with_promotion_probability(p);
        }
        if let Some(factor) = self.uplift {
            config = config.with_uplift_factor(factor);
        }
        if self.strict_dates {
            config = config.with_date_policy(DatePolicy::Strict);
        }
        if let Some(path) = self.parquet {
            config = config.with_parquet_path(path);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            common,
            metrics,
            eda,
            n_trees,
            test_fraction,
        } => {
            let mut config = common.apply(PipelineConfig::default());
            if let Some(path) = metrics {
                config = config.with_metrics_path(path);
            }
            if let Some(path) = eda {
                config = config.with_eda_path(path);
            }
            if let Some(n) = n_trees {
                config = config.with_n_trees(n);
            }
            if let Some(fraction) = test_fraction {
                config = config.with_test_fraction(fraction);
            }

            info!(input = %config.input_path.display(), "Starting training run");
            let outcome = run_training(&config)?;
            for model in &outcome.report.models {
                info!(
                    "{}: MAE {:.2}, RMSE {:.2}, R² {:.3}",
                    model.model_name, model.metrics.mae, model.metrics.rmse, model.metrics.r2
                );
            }
            info!("Model saved to {}", config.artifact_path.display());
        }
        Commands::Predict { common, output } => {
            let mut config = common.apply(PipelineConfig::default());
            if let Some(path) = output {
                config = config.with_predictions_path(path);
            }

            info!(input = %config.input_path.display(), "Starting prediction run");
            let result = run_prediction(&config)?;
            info!(
                "Wrote {} predictions to {}",
                result.predictions.len(),
                config.predictions_path.display()
            );
        }
    }

    Ok(())
}
