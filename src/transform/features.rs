//! Feature-vector concatenation.

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::domain::{Field, HouseRecord};

/// Number of predictor columns.
pub const FEATURE_COUNT: usize = Field::FEATURES.len();

/// The five predictor fields, in fixed order.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Concatenate the predictor fields of a record.
pub fn concatenate(row: &HouseRecord) -> FeatureVector {
    Field::FEATURES.map(|f| row.get(f))
}

/// Stack feature vectors into a row-major matrix for the learner.
pub fn feature_matrix(features: &[FeatureVector]) -> DenseMatrix<f64> {
    let rows: Vec<Vec<f64>> = features.iter().map(|f| f.to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_order_is_fixed() {
        let row = HouseRecord {
            overall_qual: 7.0,
            first_flr_sf: 856.0,
            gr_liv_area: 1710.0,
            garage_cars: 2.0,
            garage_area: 548.0,
            sale_price: 208500.0,
        };
        assert_eq!(concatenate(&row), [7.0, 856.0, 1710.0, 2.0, 548.0]);
    }
}
