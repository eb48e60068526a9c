//! Seeded train/test split.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::HouseRecord;
use crate::error::AppError;

/// Default share of rows held out for evaluation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.3;

/// The two halves of a split.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Vec<HouseRecord>,
    pub test: Vec<HouseRecord>,
}

/// Shuffle rows with a seeded RNG and hold out `test_fraction` of them.
///
/// The shuffle only decides membership; each half lists its rows in file order.
///
/// The test size is `round(n * test_fraction)`, reduced if needed so that the
/// training split keeps at least one row.
pub fn train_test_split(
    records: &[HouseRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, AppError> {
    if !(test_fraction.is_finite() && (0.0..1.0).contains(&test_fraction)) {
        return Err(AppError::input("Test fraction must be in [0, 1)."));
    }
    if records.is_empty() {
        return Err(AppError::no_data("Cannot split an empty dataset."));
    }

    let n = records.len();
    let n_test = ((n as f64 * test_fraction).round() as usize).min(n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // Both halves keep source row order.
    let (test_idx, train_idx) = indices.split_at_mut(n_test);
    test_idx.sort_unstable();
    train_idx.sort_unstable();
    Ok(TrainTestSplit {
        train: train_idx.iter().map(|&i| records[i]).collect(),
        test: test_idx.iter().map(|&i| records[i]).collect(),
    })
}
