//! One-versus-all multiclass wrapper.
//!
//! One `ForestBinary` per class key; prediction picks the class with the
//! highest score. Classes are fitted and scored independently (in parallel),
//! each with its own seed `seed + key`, so results do not depend on thread
//! scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::debug;

use crate::domain::ForestSettings;
use crate::error::AppError;
use crate::models::forest::ForestBinary;

/// Fitted one-versus-all model. `models[k]` scores class key `k`.
#[derive(Debug, Serialize, Deserialize)]
pub struct OneVersusAll {
    models: Vec<ForestBinary>,
}

impl OneVersusAll {
    /// Fit one binary forest per class.
    ///
    /// `keys[i]` is the class of row `i` of `x`; keys must be `< n_classes`.
    pub fn fit(
        x: &DenseMatrix<f64>,
        keys: &[u32],
        n_classes: usize,
        settings: &ForestSettings,
        n_features: usize,
        seed: u64,
    ) -> Result<Self, AppError> {
        if n_classes == 0 {
            return Err(AppError::no_data("No label classes to train on."));
        }
        if let Some(bad) = keys.iter().find(|&&k| k as usize >= n_classes) {
            return Err(AppError::model(format!(
                "Class key {bad} out of range (n_classes={n_classes})."
            )));
        }

        let models = (0..n_classes)
            .into_par_iter()
            .map(|class| {
                let targets: Vec<f64> = keys
                    .iter()
                    .map(|&k| if k as usize == class { 1.0 } else { 0.0 })
                    .collect();
                debug!(
                    class,
                    positives = targets.iter().filter(|&&t| t > 0.0).count(),
                    "Fitting binary forest"
                );
                ForestBinary::fit(x, &targets, settings, n_features, seed.wrapping_add(class as u64))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self { models })
    }

    pub fn n_classes(&self) -> usize {
        self.models.len()
    }

    /// Per-class scores: `scores[k][i]` is the score of class `k` for row `i`.
    pub fn scores(&self, x: &DenseMatrix<f64>) -> Result<Vec<Vec<f64>>, AppError> {
        self.models.par_iter().map(|m| m.score(x)).collect()
    }

    /// Predicted class key for every row of `x`.
    pub fn predict(&self, x: &DenseMatrix<f64>) -> Result<Vec<u32>, AppError> {
        let scores = self.scores(x)?;
        let n_rows = scores.first().map_or(0, Vec::len);
        (0..n_rows)
            .map(|row| {
                let row_scores: Vec<f64> = scores.iter().map(|s| s[row]).collect();
                argmax_lowest(&row_scores)
                    .map(|k| k as u32)
                    .ok_or_else(|| AppError::model(format!("Non-finite class scores for row {row}.")))
            })
            .collect()
    }
}

/// Index of the maximum score; ties go to the lowest index.
///
/// Returns `None` if there are no scores or any score is non-finite.
pub fn argmax_lowest(scores: &[f64]) -> Option<usize> {
    if scores.iter().any(|s| !s.is_finite()) {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, &s) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((idx, s)),
        }
    }
    best.map(|(idx, _)| idx)
}
