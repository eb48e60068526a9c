//! Shared "training run" logic used by the `run` and `train` commands.
//!
//! load CSV -> seeded split -> fit pipeline -> score test split -> metrics
//!
//! Persisting, reloading and the single inference call are handled by the
//! callers in `app`.

use tracing::{info, warn};

use crate::data::train_test_split;
use crate::domain::{HouseRecord, TrainConfig};
use crate::error::AppError;
use crate::fit::{TrainedPipeline, fit_pipeline};
use crate::io::ingest::{IngestedData, load_house_records};
use crate::report::{EvaluationMetrics, ScoredRow, evaluate};

/// All computed outputs of a single training run.
#[derive(Debug)]
pub struct TrainingRun {
    pub ingest: IngestedData,
    pub n_train: usize,
    pub test_rows: Vec<HouseRecord>,
    pub scored: Vec<ScoredRow>,
    pub metrics: Option<EvaluationMetrics>,
    pub pipeline: TrainedPipeline,
}

/// Execute the training run, reading the CSV named in `config`.
pub fn run_training(config: &TrainConfig) -> Result<TrainingRun, AppError> {
    let ingest = load_house_records(&config.data_path)?;
    run_training_with_data(config, ingest)
}

/// Execute the training run on already-ingested data.
pub fn run_training_with_data(config: &TrainConfig, ingest: IngestedData) -> Result<TrainingRun, AppError> {
    let split = train_test_split(&ingest.records, config.test_fraction, config.pipeline.seed)?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        seed = config.pipeline.seed,
        "Split dataset"
    );

    let pipeline = fit_pipeline(&config.pipeline, &split.train)?;

    let predictions = pipeline.predict_batch(&split.test)?;
    let scored: Vec<ScoredRow> = split
        .test
        .iter()
        .zip(&predictions)
        .map(|(row, p)| ScoredRow {
            actual: pipeline.imputer.transform(row).sale_price,
            predicted: p.sale_price,
        })
        .collect();

    let metrics = evaluate(&scored, &pipeline.labels);
    match &metrics {
        Some(m) => {
            if m.unseen_labels > 0 {
                warn!(
                    unseen = m.unseen_labels,
                    "Test rows carry sale prices never seen in training"
                );
            }
            info!(
                micro_accuracy = m.micro_accuracy,
                mae = m.mae,
                rmse = m.rmse,
                "Evaluated test split"
            );
        }
        None => warn!("Test split is empty; skipping evaluation"),
    }

    Ok(TrainingRun {
        ingest,
        n_train: split.train.len(),
        test_rows: split.test,
        scored,
        metrics,
        pipeline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HouseRecord, PipelineSettings, TrainConfig};
    use crate::fit::pipeline::tests::{small_settings, tiered_rows};
    use crate::io::ingest::read_house_records;
    use crate::io::ingest::tests::housing_csv;
    use std::path::PathBuf;

    fn config(pipeline: PipelineSettings) -> TrainConfig {
        TrainConfig {
            data_path: PathBuf::from("unused.csv"),
            model_path: PathBuf::from("unused.bin.gz"),
            test_fraction: 0.3,
            pipeline,
            export_metrics: None,
            export_predictions: None,
        }
    }

    fn ingest_of(rows: &[HouseRecord]) -> IngestedData {
        let cells: Vec<[String; 6]> = rows
            .iter()
            .map(|r| {
                [
                    r.overall_qual.to_string(),
                    r.first_flr_sf.to_string(),
                    r.gr_liv_area.to_string(),
                    r.garage_cars.to_string(),
                    r.garage_area.to_string(),
                    r.sale_price.to_string(),
                ]
            })
            .collect();
        let borrowed: Vec<[&str; 6]> = cells.iter().map(|c| c.each_ref().map(String::as_str)).collect();
        read_house_records(housing_csv(&borrowed).as_bytes()).unwrap()
    }

    #[test]
    fn run_splits_fits_and_scores() {
        let rows = tiered_rows();
        let run = run_training_with_data(&config(small_settings()), ingest_of(&rows)).unwrap();

        let n_test = (rows.len() as f64 * 0.3).round() as usize;
        assert_eq!(run.test_rows.len(), n_test);
        assert_eq!(run.n_train, rows.len() - n_test);
        assert_eq!(run.scored.len(), n_test);

        let m = run.metrics.unwrap();
        assert_eq!(m.n_test, n_test);
        assert!(m.micro_accuracy > 0.5, "micro accuracy {}", m.micro_accuracy);
    }

    #[test]
    fn zero_test_fraction_skips_metrics() {
        let mut cfg = config(small_settings());
        cfg.test_fraction = 0.0;
        let run = run_training_with_data(&cfg, ingest_of(&tiered_rows())).unwrap();
        assert!(run.metrics.is_none());
        assert!(run.scored.is_empty());
    }
}
