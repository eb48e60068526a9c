//! Forest binary estimator.
//!
//! A random forest of regression trees fitted on `{0, 1}` targets. The
//! averaged tree output is the positive-class score, so no calibration step is
//! needed before one-versus-all comparison.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::domain::ForestSettings;
use crate::error::AppError;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A fitted binary forest.
#[derive(Serialize, Deserialize)]
pub struct ForestBinary {
    forest: Forest,
}

impl std::fmt::Debug for ForestBinary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForestBinary").finish_non_exhaustive()
    }
}

impl ForestBinary {
    /// Fit on a feature matrix and `{0, 1}` targets.
    pub fn fit(
        x: &DenseMatrix<f64>,
        targets: &Vec<f64>,
        settings: &ForestSettings,
        n_features: usize,
        seed: u64,
    ) -> Result<Self, AppError> {
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(settings.trees.into())
            .with_max_depth(settings.max_depth)
            .with_min_samples_leaf(settings.min_samples_leaf)
            .with_m(features_per_split(settings.feature_fraction, n_features))
            .with_seed(seed);

        let forest = RandomForestRegressor::fit(x, targets, params)
            .map_err(|e| AppError::model(format!("Forest fit failed: {e}")))?;
        Ok(Self { forest })
    }

    /// Positive-class score for every row of `x`.
    pub fn score(&self, x: &DenseMatrix<f64>) -> Result<Vec<f64>, AppError> {
        self.forest
            .predict(x)
            .map_err(|e| AppError::model(format!("Forest predict failed: {e}")))
    }
}

/// Number of features tried per split: `ceil(fraction * n)`, clamped to `[1, n]`.
pub fn features_per_split(fraction: f64, n_features: usize) -> usize {
    let n = n_features.max(1);
    if !fraction.is_finite() || fraction <= 0.0 {
        return 1;
    }
    ((fraction * n as f64).ceil() as usize).clamp(1, n)
}

/// Validate forest settings before any fitting starts.
pub fn validate_settings(settings: &ForestSettings) -> Result<(), AppError> {
    if settings.trees == 0 {
        return Err(AppError::input("Tree count must be > 0."));
    }
    if settings.max_depth == 0 {
        return Err(AppError::input("Max depth must be > 0."));
    }
    if settings.min_samples_leaf == 0 {
        return Err(AppError::input("Min samples per leaf must be > 0."));
    }
    if !(settings.feature_fraction.is_finite()
        && settings.feature_fraction > 0.0
        && settings.feature_fraction <= 1.0)
    {
        return Err(AppError::input("Feature fraction must be in (0, 1]."));
    }
    Ok(())
}
