//! Shared domain types.
//!
//! These types are kept small and serializable so the same values can be used
//! in-memory during training, stored inside the model artifact and exported to
//! JSON/CSV.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Minimum number of columns a data row must have.
///
/// The sale price sits in the last column of the housing export (index 80).
pub const MIN_COLUMNS: usize = 81;

/// One of the six numeric fields read from the housing CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OverallQual,
    FirstFlrSf,
    GrLivArea,
    GarageCars,
    GarageArea,
    SalePrice,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 6] = [
        Field::OverallQual,
        Field::FirstFlrSf,
        Field::GrLivArea,
        Field::GarageCars,
        Field::GarageArea,
        Field::SalePrice,
    ];

    /// Predictor fields, in feature-vector order.
    pub const FEATURES: [Field; 5] = [
        Field::OverallQual,
        Field::FirstFlrSf,
        Field::GrLivArea,
        Field::GarageCars,
        Field::GarageArea,
    ];

    /// 0-based column index in the CSV.
    pub fn column(self) -> usize {
        match self {
            Field::OverallQual => 17,
            Field::FirstFlrSf => 43,
            Field::GrLivArea => 46,
            Field::GarageCars => 61,
            Field::GarageArea => 62,
            Field::SalePrice => 80,
        }
    }

    /// Column name as it appears in the housing export header.
    pub fn display_name(self) -> &'static str {
        match self {
            Field::OverallQual => "OverallQual",
            Field::FirstFlrSf => "1stFlrSF",
            Field::GrLivArea => "GrLivArea",
            Field::GarageCars => "GarageCars",
            Field::GarageArea => "GarageArea",
            Field::SalePrice => "SalePrice",
        }
    }

    /// Position of this field inside `Field::ALL`.
    pub fn index(self) -> usize {
        match self {
            Field::OverallQual => 0,
            Field::FirstFlrSf => 1,
            Field::GrLivArea => 2,
            Field::GarageCars => 3,
            Field::GarageArea => 4,
            Field::SalePrice => 5,
        }
    }
}

/// A housing sample. Missing values are `NaN` until imputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub overall_qual: f64,
    pub first_flr_sf: f64,
    pub gr_liv_area: f64,
    pub garage_cars: f64,
    pub garage_area: f64,
    pub sale_price: f64,
}

impl HouseRecord {
    /// Build an inference input; the label is unknown and left missing.
    pub fn features_only(
        overall_qual: f64,
        first_flr_sf: f64,
        gr_liv_area: f64,
        garage_cars: f64,
        garage_area: f64,
    ) -> Self {
        Self {
            overall_qual,
            first_flr_sf,
            gr_liv_area,
            garage_cars,
            garage_area,
            sale_price: f64::NAN,
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::OverallQual => self.overall_qual,
            Field::FirstFlrSf => self.first_flr_sf,
            Field::GrLivArea => self.gr_liv_area,
            Field::GarageCars => self.garage_cars,
            Field::GarageArea => self.garage_area,
            Field::SalePrice => self.sale_price,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::OverallQual => self.overall_qual = value,
            Field::FirstFlrSf => self.first_flr_sf = value,
            Field::GrLivArea => self.gr_liv_area = value,
            Field::GarageCars => self.garage_cars = value,
            Field::GarageArea => self.garage_area = value,
            Field::SalePrice => self.sale_price = value,
        }
    }
}

/// Model output for one house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousePrediction {
    pub sale_price: f64,
}

/// How missing values are replaced before training and inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceMissing {
    /// Replace with the type default (`0`).
    Default,
    /// Replace with the mean of observed training values.
    Mean,
    /// Replace with the smallest observed training value.
    Minimum,
    /// Replace with the largest observed training value.
    Maximum,
}

/// Settings of the forest binary estimator.
///
/// Defaults follow the usual fast-forest configuration: 100 trees, shallow
/// trees, at least 10 rows per leaf and 70% of features tried per split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSettings {
    pub trees: u16,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    /// Fraction of features sampled per split, in `(0, 1]`.
    pub feature_fraction: f64,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 5,
            min_samples_leaf: 10,
            feature_fraction: 0.7,
        }
    }
}

/// Everything the pipeline needs to be fitted reproducibly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub replace_missing: ReplaceMissing,
    pub forest: ForestSettings,
    pub seed: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            replace_missing: ReplaceMissing::Default,
            forest: ForestSettings::default(),
            seed: 42,
        }
    }
}

/// A full training run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub test_fraction: f64,
    pub pipeline: PipelineSettings,

    pub export_metrics: Option<PathBuf>,
    pub export_predictions: Option<PathBuf>,
}

/// Summary stats about the rows read from the CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_rows: usize,
    /// Missing cells per field, indexed like `Field::ALL`.
    pub missing: [usize; 6],
    pub price_min: f64,
    pub price_max: f64,
    pub distinct_prices: usize,
}
