//! CSV ingest.
//!
//! Turns the housing export (header row + at least 81 comma-separated columns)
//! into `HouseRecord`s. Only six columns are read, by position.
//!
//! - Empty cells and `NA` become missing values (`NaN`); imputation happens
//!   later in the pipeline, not here.
//! - Any other unparseable cell, or a short row, fails the whole load with the
//!   offending line number.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{DatasetStats, Field, HouseRecord, MIN_COLUMNS};
use crate::error::AppError;

/// Ingest output: parsed records + stats.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<HouseRecord>,
    pub stats: DatasetStats,
}

/// Load housing records from a CSV file.
pub fn load_house_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    info!(path = %path.display(), "Loading housing data");
    let data = read_house_records(file)?;
    info!(
        rows = data.stats.n_rows,
        distinct_prices = data.stats.distinct_prices,
        "Housing data loaded"
    );
    Ok(data)
}

/// Parse housing records from any reader (header row first).
pub fn read_house_records<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    debug!(columns = headers.len(), "CSV header read");

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts right after the header, which is line 1.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("CSV parse error on line {line}: {e}")))?;
        records.push(parse_row(&record, line)?);
    }

    let stats = compute_stats(&records)
        .ok_or_else(|| AppError::no_data("CSV contains no data rows."))?;

    Ok(IngestedData { records, stats })
}

fn parse_row(record: &StringRecord, line: usize) -> Result<HouseRecord, AppError> {
    if record.len() < MIN_COLUMNS {
        return Err(AppError::input(format!(
            "Line {line}: expected at least {MIN_COLUMNS} columns, found {}.",
            record.len()
        )));
    }

    let mut row = HouseRecord {
        overall_qual: f64::NAN,
        first_flr_sf: f64::NAN,
        gr_liv_area: f64::NAN,
        garage_cars: f64::NAN,
        garage_area: f64::NAN,
        sale_price: f64::NAN,
    };
    for field in Field::ALL {
        let raw = record.get(field.column()).unwrap_or("");
        let value = parse_cell(raw).ok_or_else(|| {
            AppError::input(format!(
                "Line {line}: invalid value '{raw}' in column {} (`{}`).",
                field.column(),
                field.display_name()
            ))
        })?;
        row.set(field, value);
    }
    Ok(row)
}

/// Parse one numeric cell. Missing markers yield `NaN`; garbage yields `None`.
fn parse_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") {
        return Some(f64::NAN);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn compute_stats(records: &[HouseRecord]) -> Option<DatasetStats> {
    if records.is_empty() {
        return None;
    }

    let mut missing = [0usize; 6];
    let mut price_min = f64::INFINITY;
    let mut price_max = f64::NEG_INFINITY;
    let mut distinct = HashSet::new();

    for r in records {
        for field in Field::ALL {
            if r.get(field).is_nan() {
                missing[field.index()] += 1;
            }
        }
        if !r.sale_price.is_nan() {
            price_min = price_min.min(r.sale_price);
            price_max = price_max.max(r.sale_price);
            // `+ 0.0` folds -0.0 into 0.0.
            distinct.insert((r.sale_price + 0.0).to_bits());
        }
    }

    if !price_min.is_finite() {
        price_min = f64::NAN;
        price_max = f64::NAN;
    }

    Some(DatasetStats {
        n_rows: records.len(),
        missing,
        price_min,
        price_max,
        distinct_prices: distinct.len(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a header + rows CSV with `MIN_COLUMNS` columns, placing the six
    /// values at their real positions and filler elsewhere.
    pub(crate) fn housing_csv(rows: &[[&str; 6]]) -> String {
        let mut out = String::new();
        let header: Vec<String> = (0..MIN_COLUMNS)
            .map(|c| {
                Field::ALL
                    .iter()
                    .find(|f| f.column() == c)
                    .map(|f| f.display_name().to_string())
                    .unwrap_or_else(|| format!("Col{c}"))
            })
            .collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for (i, values) in rows.iter().enumerate() {
            let mut cells: Vec<String> = (0..MIN_COLUMNS).map(|_| "x".to_string()).collect();
            cells[0] = (i + 1).to_string();
            for field in Field::ALL {
                cells[field.column()] = values[field.index()].to_string();
            }
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    #[test]
    fn reads_known_row_values() {
        let csv = housing_csv(&[
            ["7", "856", "1710", "2", "548", "208500"],
            ["6", "1262", "1262", "2", "460", "181500"],
        ]);
        let data = read_house_records(csv.as_bytes()).unwrap();

        assert_eq!(data.records.len(), 2);
        let r = data.records[1];
        assert_eq!(r.overall_qual, 6.0);
        assert_eq!(r.first_flr_sf, 1262.0);
        assert_eq!(r.gr_liv_area, 1262.0);
        assert_eq!(r.garage_cars, 2.0);
        assert_eq!(r.garage_area, 460.0);
        assert_eq!(r.sale_price, 181500.0);

        assert_eq!(data.stats.n_rows, 2);
        assert_eq!(data.stats.distinct_prices, 2);
        assert_eq!(data.stats.price_min, 181500.0);
        assert_eq!(data.stats.price_max, 208500.0);
    }

    #[test]
    fn na_and_empty_cells_are_missing() {
        let csv = housing_csv(&[["5", "900", "900", "NA", "", "100000"]]);
        let data = read_house_records(csv.as_bytes()).unwrap();

        let r = data.records[0];
        assert!(r.garage_cars.is_nan());
        assert!(r.garage_area.is_nan());
        assert_eq!(data.stats.missing[Field::GarageCars.index()], 1);
        assert_eq!(data.stats.missing[Field::GarageArea.index()], 1);
        assert_eq!(data.stats.missing[Field::SalePrice.index()], 0);
    }

    #[test]
    fn garbage_cell_is_an_error_with_line_number() {
        let csv = housing_csv(&[
            ["5", "900", "900", "1", "200", "100000"],
            ["5", "lots", "900", "1", "200", "100000"],
        ]);
        let err = read_house_records(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Line 3"), "{}", err.message());
        assert!(err.message().contains("1stFlrSF"), "{}", err.message());
    }

    #[test]
    fn short_row_is_an_error() {
        let csv = "a,b,c\n1,2,3\n";
        let err = read_house_records(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("at least 81 columns"));
    }

    #[test]
    fn header_only_is_no_data() {
        let csv = housing_csv(&[]);
        let err = read_house_records(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = load_house_records(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
