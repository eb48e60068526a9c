//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays free of I/O and
//! output changes stay localized.

use crate::app::pipeline::TrainingRun;
use crate::domain::{DatasetStats, Field, HousePrediction, TrainConfig};
use crate::report::EvaluationMetrics;

/// The single prediction line printed by the `run` and `predict` commands.
pub fn format_prediction(prediction: &HousePrediction) -> String {
    format!("Predicted SalePrice: {}", prediction.sale_price)
}

/// Format the run summary (dataset stats + split + settings + metrics).
pub fn format_run_summary(run: &TrainingRun, config: &TrainConfig) -> String {
    let mut out = String::new();

    out.push_str("=== house-price - training run ===\n");
    out.push_str(&format!("Data: {}\n", config.data_path.display()));
    out.push_str(&format_stats(&run.ingest.stats));
    out.push_str(&format!(
        "Split: train={} | test={} (test fraction {:.2}, seed {})\n",
        run.n_train,
        run.test_rows.len(),
        config.test_fraction,
        config.pipeline.seed
    ));

    let forest = &config.pipeline.forest;
    out.push_str("\nPipeline:\n");
    out.push_str(&format!(
        "- replace missing: {:?}\n",
        config.pipeline.replace_missing
    ));
    out.push_str(&format!(
        "- features: {}\n",
        Field::FEATURES.map(Field::display_name).join(", ")
    ));
    out.push_str(&format!("- classes: {}\n", run.pipeline.n_classes()));
    out.push_str(&format!(
        "- one-versus-all forest: trees={} max_depth={} min_leaf={} feature_fraction={:.2}\n",
        forest.trees, forest.max_depth, forest.min_samples_leaf, forest.feature_fraction
    ));

    out.push_str("\nTest split:\n");
    match &run.metrics {
        Some(m) => out.push_str(&format_metrics(m)),
        None => out.push_str("  (empty, no evaluation)\n"),
    }

    out
}

fn format_stats(stats: &DatasetStats) -> String {
    let mut out = format!(
        "Rows: n={} | SalePrice=[{:.0}, {:.0}] | distinct prices={}\n",
        stats.n_rows, stats.price_min, stats.price_max, stats.distinct_prices
    );

    let missing: Vec<String> = Field::ALL
        .iter()
        .filter(|f| stats.missing[f.index()] > 0)
        .map(|f| format!("{}={}", f.display_name(), stats.missing[f.index()]))
        .collect();
    if !missing.is_empty() {
        out.push_str(&format!("Missing cells: {}\n", missing.join(", ")));
    }
    out
}

/// Format evaluation metrics as an indented block.
pub fn format_metrics(m: &EvaluationMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("  rows           : {}\n", m.n_test));
    out.push_str(&format!("  micro accuracy : {:.4}\n", m.micro_accuracy));
    out.push_str(&format!("  macro accuracy : {:.4}\n", m.macro_accuracy));
    out.push_str(&format!("  MAE            : {:.2}\n", m.mae));
    out.push_str(&format!("  RMSE           : {:.2}\n", m.rmse));
    if m.unseen_labels > 0 {
        out.push_str(&format!("  unseen prices  : {}\n", m.unseen_labels));
    }
    out
}
