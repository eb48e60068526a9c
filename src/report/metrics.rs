//! Evaluation of a scored test split.
//!
//! The labels are prices turned into classes, so the split is judged both as a
//! classifier (exact-hit accuracy) and as a regressor (price error).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transform::LabelMap;

/// One test row after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub actual: f64,
    pub predicted: f64,
}

impl ScoredRow {
    pub fn error(&self) -> f64 {
        self.predicted - self.actual
    }
}

/// Test-split metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub n_test: usize,
    /// Fraction of rows whose predicted price equals the actual price.
    pub micro_accuracy: f64,
    /// Mean per-class hit rate over the classes present in the test split.
    pub macro_accuracy: f64,
    pub mae: f64,
    pub rmse: f64,
    /// Test rows whose price never occurred in training (always misses).
    pub unseen_labels: usize,
}

/// Compute metrics; `None` when there are no scored rows.
pub fn evaluate(rows: &[ScoredRow], labels: &LabelMap) -> Option<EvaluationMetrics> {
    if rows.is_empty() {
        return None;
    }

    let n = rows.len() as f64;
    let mut hits = 0usize;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut unseen = 0usize;
    // class (canonical bits of the actual price) -> (hits, total)
    let mut per_class: BTreeMap<u64, (usize, usize)> = BTreeMap::new();

    for r in rows {
        let hit = (r.predicted + 0.0).to_bits() == (r.actual + 0.0).to_bits();
        if hit {
            hits += 1;
        }
        if labels.key_of(r.actual).is_none() {
            unseen += 1;
        }
        let entry = per_class.entry((r.actual + 0.0).to_bits()).or_insert((0, 0));
        entry.0 += usize::from(hit);
        entry.1 += 1;

        let e = r.error();
        abs_sum += e.abs();
        sq_sum += e * e;
    }

    let macro_accuracy = per_class
        .values()
        .map(|&(h, t)| h as f64 / t as f64)
        .sum::<f64>()
        / per_class.len() as f64;

    Some(EvaluationMetrics {
        n_test: rows.len(),
        micro_accuracy: hits as f64 / n,
        macro_accuracy,
        mae: abs_sum / n,
        rmse: (sq_sum / n).sqrt(),
        unseen_labels: unseen,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(actual: f64, predicted: f64) -> ScoredRow {
        ScoredRow { actual, predicted }
    }

    #[test]
    fn evaluate_basic() {
        let labels = LabelMap::fit([100.0, 200.0]);
        let rows = vec![
            row(100.0, 100.0),
            row(100.0, 200.0),
            row(200.0, 200.0),
            row(300.0, 200.0),
        ];
        let m = evaluate(&rows, &labels).unwrap();

        assert_eq!(m.n_test, 4);
        assert!((m.micro_accuracy - 0.5).abs() < 1e-12);
        // classes: 100 -> 1/2, 200 -> 1/1, 300 -> 0/1
        assert!((m.macro_accuracy - 0.5).abs() < 1e-12);
        // errors: 0, 100, 0, -100
        assert!((m.mae - 50.0).abs() < 1e-12);
        assert!((m.rmse - (20_000.0_f64 / 4.0).sqrt()).abs() < 1e-9);
        assert_eq!(m.unseen_labels, 1);
    }

    #[test]
    fn empty_split_has_no_metrics() {
        assert!(evaluate(&[], &LabelMap::default()).is_none());
    }
}
