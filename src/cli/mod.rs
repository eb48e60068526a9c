//! Command-line parsing for the house-price trainer.
//!
//! Argument parsing and command dispatch stay separate from the pipeline code.
//! Every path and the seed can also come from the environment (or a `.env`
//! file), so a bare `house-price` reproduces the fixed-path workflow.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::data::DEFAULT_TEST_FRACTION;
use crate::domain::{ForestSettings, HouseRecord, ReplaceMissing};

/// Default location of the training CSV.
pub const DEFAULT_DATA_PATH: &str = "train.csv";
/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "home_price_predictor_model.bin.gz";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "house-price", version, about = "House sale-price model: train, persist, predict")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train, save, reload, and predict one house (the default).
    Run(RunArgs),
    /// Train, evaluate, and save the model without predicting.
    Train(TrainArgs),
    /// Load a saved model and predict one house.
    Predict(PredictArgs),
}

/// Options shared by every command that trains a model.
#[derive(Debug, Args, Clone)]
pub struct TrainArgs {
    /// Training CSV (header row, at least 81 columns).
    #[arg(long, env = "HOUSE_PRICE_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Where the model artifact is written.
    #[arg(long, env = "HOUSE_PRICE_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Seed for the train/test split and the forests.
    #[arg(long, env = "HOUSE_PRICE_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Share of rows held out for evaluation.
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_fraction: f64,

    /// How missing values are replaced.
    #[arg(long, value_enum, default_value_t = ReplaceMissing::Default)]
    pub replace_missing: ReplaceMissing,

    /// Trees per binary forest.
    #[arg(long, default_value_t = ForestSettings::default().trees)]
    pub trees: u16,

    /// Maximum tree depth.
    #[arg(long, default_value_t = ForestSettings::default().max_depth)]
    pub max_depth: u16,

    /// Minimum rows per leaf.
    #[arg(long, default_value_t = ForestSettings::default().min_samples_leaf)]
    pub min_samples_leaf: usize,

    /// Fraction of features tried per split.
    #[arg(long, default_value_t = ForestSettings::default().feature_fraction)]
    pub feature_fraction: f64,

    /// Export test-split metrics and settings to JSON.
    #[arg(long = "export-metrics")]
    pub export_metrics: Option<PathBuf>,

    /// Export per-row test predictions to CSV.
    #[arg(long = "export-predictions")]
    pub export_predictions: Option<PathBuf>,
}

/// The house to price.
#[derive(Debug, Args, Clone)]
pub struct HouseArgs {
    /// Overall material and finish quality.
    #[arg(long, default_value_t = 7.0)]
    pub overall_qual: f64,

    /// First-floor area (sq ft).
    #[arg(long, default_value_t = 856.0)]
    pub first_flr_sf: f64,

    /// Above-ground living area (sq ft).
    #[arg(long, default_value_t = 1710.0)]
    pub gr_liv_area: f64,

    /// Garage capacity in cars.
    #[arg(long, default_value_t = 2.0)]
    pub garage_cars: f64,

    /// Garage area (sq ft).
    #[arg(long, default_value_t = 548.0)]
    pub garage_area: f64,
}

impl HouseArgs {
    pub fn to_record(&self) -> HouseRecord {
        HouseRecord::features_only(
            self.overall_qual,
            self.first_flr_sf,
            self.gr_liv_area,
            self.garage_cars,
            self.garage_area,
        )
    }
}

/// Options for the full train -> save -> reload -> predict flow.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    #[command(flatten)]
    pub house: HouseArgs,

    /// Print the training summary before the prediction.
    #[arg(long)]
    pub summary: bool,

    /// Exit right after printing the prediction instead of waiting for a key.
    #[arg(long)]
    pub no_wait: bool,
}

/// Options for predicting with a saved model.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Model artifact produced by `run` or `train`.
    #[arg(long, env = "HOUSE_PRICE_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    #[command(flatten)]
    pub house: HouseArgs,
}
