//! The fixed training pipeline:
//!
//! replace missing values -> concatenate features -> map label to key
//! -> one-versus-all forest -> map predicted key back to a sale price
//!
//! `fit_pipeline` learns every stage from the training rows; the resulting
//! `TrainedPipeline` applies the same stages at inference and is what gets
//! persisted.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{HousePrediction, HouseRecord, PipelineSettings};
use crate::error::AppError;
use crate::models::{OneVersusAll, validate_settings};
use crate::transform::{
    FEATURE_COUNT, FeatureVector, LabelMap, MissingValueImputer, concatenate, feature_matrix,
};

/// A fitted pipeline, ready for inference.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedPipeline {
    pub settings: PipelineSettings,
    pub imputer: MissingValueImputer,
    pub labels: LabelMap,
    pub classifier: OneVersusAll,
}

/// Fit every pipeline stage on the training rows.
pub fn fit_pipeline(settings: &PipelineSettings, rows: &[HouseRecord]) -> Result<TrainedPipeline, AppError> {
    validate_settings(&settings.forest)?;
    if rows.is_empty() {
        return Err(AppError::no_data("Training split is empty."));
    }

    let imputer = MissingValueImputer::fit(settings.replace_missing, rows);
    let cleaned: Vec<HouseRecord> = rows.iter().map(|r| imputer.transform(r)).collect();

    let features: Vec<FeatureVector> = cleaned.iter().map(concatenate).collect();
    let labels = LabelMap::fit(cleaned.iter().map(|r| r.sale_price));
    let keys = cleaned
        .iter()
        .map(|r| {
            labels
                .key_of(r.sale_price)
                .ok_or_else(|| AppError::model(format!("Label {} missing from label map.", r.sale_price)))
        })
        .collect::<Result<Vec<u32>, AppError>>()?;

    info!(
        rows = rows.len(),
        classes = labels.len(),
        trees = settings.forest.trees,
        seed = settings.seed,
        "Fitting one-versus-all forest"
    );

    let x = feature_matrix(&features);
    let classifier = OneVersusAll::fit(
        &x,
        &keys,
        labels.len(),
        &settings.forest,
        FEATURE_COUNT,
        settings.seed,
    )?;

    Ok(TrainedPipeline {
        settings: settings.clone(),
        imputer,
        labels,
        classifier,
    })
}

impl TrainedPipeline {
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// Predict the sale price of one house. The record's own sale price is ignored.
    pub fn predict(&self, row: &HouseRecord) -> Result<HousePrediction, AppError> {
        self.predict_batch(std::slice::from_ref(row))?
            .pop()
            .ok_or_else(|| AppError::model("Pipeline produced no prediction."))
    }

    /// Predict sale prices for a batch of houses, in input order.
    pub fn predict_batch(&self, rows: &[HouseRecord]) -> Result<Vec<HousePrediction>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let features: Vec<FeatureVector> = rows
            .iter()
            .map(|r| concatenate(&self.imputer.transform(r)))
            .collect();
        let keys = self.classifier.predict(&feature_matrix(&features))?;

        keys.into_iter()
            .map(|key| {
                self.labels
                    .value_of(key)
                    .map(|sale_price| HousePrediction { sale_price })
                    .ok_or_else(|| AppError::model(format!("Predicted key {key} has no label value.")))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ForestSettings, ReplaceMissing};

    /// Three well-separated price tiers, 12 houses each.
    pub(crate) fn tiered_rows() -> Vec<HouseRecord> {
        let tiers = [
            (4.0, 700.0, 900.0, 1.0, 250.0, 100_000.0),
            (6.0, 1100.0, 1500.0, 2.0, 480.0, 180_000.0),
            (9.0, 1800.0, 2600.0, 3.0, 800.0, 350_000.0),
        ];
        let mut rows = Vec::new();
        for (q, f, g, c, a, p) in tiers {
            for j in 0..12 {
                let d = j as f64;
                rows.push(HouseRecord {
                    overall_qual: q,
                    first_flr_sf: f + d * 5.0,
                    gr_liv_area: g + d * 7.0,
                    garage_cars: c,
                    garage_area: a + d * 3.0,
                    sale_price: p,
                });
            }
        }
        rows
    }

    pub(crate) fn small_settings() -> PipelineSettings {
        PipelineSettings {
            replace_missing: ReplaceMissing::Default,
            forest: ForestSettings {
                trees: 10,
                max_depth: 4,
                min_samples_leaf: 1,
                feature_fraction: 1.0,
            },
            seed: 42,
        }
    }

    #[test]
    fn fit_and_predict_tiers() {
        let pipeline = fit_pipeline(&small_settings(), &tiered_rows()).unwrap();
        assert_eq!(pipeline.n_classes(), 3);

        let cheap = HouseRecord::features_only(4.0, 720.0, 930.0, 1.0, 260.0);
        let pricey = HouseRecord::features_only(9.0, 1830.0, 2650.0, 3.0, 820.0);
        assert_eq!(pipeline.predict(&cheap).unwrap().sale_price, 100_000.0);
        assert_eq!(pipeline.predict(&pricey).unwrap().sale_price, 350_000.0);
    }

    #[test]
    fn predictions_are_deterministic_for_a_seed() {
        let probe = HouseRecord::features_only(7.0, 856.0, 1710.0, 2.0, 548.0);
        let a = fit_pipeline(&small_settings(), &tiered_rows()).unwrap();
        let b = fit_pipeline(&small_settings(), &tiered_rows()).unwrap();
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn predicted_value_is_always_a_training_label() {
        let pipeline = fit_pipeline(&small_settings(), &tiered_rows()).unwrap();
        let probe = HouseRecord::features_only(f64::NAN, 1000.0, f64::NAN, 2.0, 400.0);
        let price = pipeline.predict(&probe).unwrap().sale_price;
        assert!(pipeline.labels.key_of(price).is_some());
    }

    #[test]
    fn empty_training_split_is_rejected() {
        let err = fit_pipeline(&small_settings(), &[]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn empty_batch_predicts_nothing() {
        let pipeline = fit_pipeline(&small_settings(), &tiered_rows()).unwrap();
        assert!(pipeline.predict_batch(&[]).unwrap().is_empty());
    }
}
