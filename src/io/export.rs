//! Export test-split results.
//!
//! - metrics + pipeline settings as JSON
//! - per-row test predictions as CSV (easy to open in a spreadsheet)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DatasetStats, HouseRecord, PipelineSettings};
use crate::error::AppError;
use crate::report::{EvaluationMetrics, ScoredRow};

/// JSON document written by `--export-metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub tool: String,
    pub dataset: DatasetStats,
    pub train_rows: usize,
    pub test_fraction: f64,
    pub settings: PipelineSettings,
    pub classes: usize,
    pub metrics: Option<EvaluationMetrics>,
}

/// Write a metrics report as pretty JSON.
pub fn write_metrics_json(path: &Path, report: &MetricsReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create metrics JSON '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::input(format!("Failed to write metrics JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to write metrics JSON: {e}")))?;

    Ok(())
}

/// Write per-row test predictions to a CSV file.
///
/// `rows[i]` must be the test record that produced `scored[i]`.
pub fn write_predictions_csv(path: &Path, rows: &[HouseRecord], scored: &[ScoredRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(
        file,
        "overall_qual,first_flr_sf,gr_liv_area,garage_cars,garage_area,actual,predicted,error"
    )
    .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for (r, s) in rows.iter().zip(scored) {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            fmt_cell(r.overall_qual),
            fmt_cell(r.first_flr_sf),
            fmt_cell(r.gr_liv_area),
            fmt_cell(r.garage_cars),
            fmt_cell(r.garage_area),
            s.actual,
            s.predicted,
            s.error(),
        )
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    file.flush()
        .map_err(|e| AppError::input(format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

fn fmt_cell(v: f64) -> String {
    if v.is_nan() { "NA".to_string() } else { v.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn predictions_csv_has_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preds.csv");

        let rows = vec![HouseRecord {
            overall_qual: 7.0,
            first_flr_sf: 856.0,
            gr_liv_area: 1710.0,
            garage_cars: f64::NAN,
            garage_area: 548.0,
            sale_price: 208500.0,
        }];
        let scored = vec![ScoredRow {
            actual: 208500.0,
            predicted: 200000.0,
        }];
        write_predictions_csv(&path, &rows, &scored).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("overall_qual,"));
        assert_eq!(lines[1], "7,856,1710,NA,548,208500,200000,-8500");
    }

    #[test]
    fn metrics_json_has_expected_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics.json");

        let report = MetricsReport {
            tool: "house-price".to_string(),
            dataset: DatasetStats {
                n_rows: 3,
                missing: [0; 6],
                price_min: 1.0,
                price_max: 3.0,
                distinct_prices: 3,
            },
            train_rows: 2,
            test_fraction: 0.3,
            settings: PipelineSettings::default(),
            classes: 2,
            metrics: None,
        };
        write_metrics_json(&path, &report).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["train_rows"], 2);
        assert_eq!(value["settings"]["replace_missing"], "default");
        assert!(value["metrics"].is_null());
    }
}
