//! Missing-value replacement for all six record fields.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, HouseRecord, ReplaceMissing};

/// Fitted replacement values, indexed like `Field::ALL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueImputer {
    pub mode: ReplaceMissing,
    pub replacements: [f64; 6],
}

impl MissingValueImputer {
    /// Learn replacement values from the training rows.
    ///
    /// A column without any observed value falls back to `0`.
    pub fn fit(mode: ReplaceMissing, rows: &[HouseRecord]) -> Self {
        let mut replacements = [0.0; 6];
        if mode != ReplaceMissing::Default {
            for field in Field::ALL {
                let observed = rows.iter().map(|r| r.get(field)).filter(|v| !v.is_nan());
                replacements[field.index()] = column_statistic(mode, observed).unwrap_or(0.0);
            }
        }
        Self { mode, replacements }
    }

    pub fn replacement(&self, field: Field) -> f64 {
        self.replacements[field.index()]
    }

    /// Return a copy of `row` with every missing field replaced.
    pub fn transform(&self, row: &HouseRecord) -> HouseRecord {
        let mut out = *row;
        for field in Field::ALL {
            if out.get(field).is_nan() {
                out.set(field, self.replacement(field));
            }
        }
        out
    }
}

fn column_statistic(mode: ReplaceMissing, values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    if count == 0 {
        return None;
    }
    match mode {
        ReplaceMissing::Default => Some(0.0),
        ReplaceMissing::Mean => Some(sum / count as f64),
        ReplaceMissing::Minimum => Some(min),
        ReplaceMissing::Maximum => Some(max),
    }
}
