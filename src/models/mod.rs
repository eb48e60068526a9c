//! Estimators built on the forest learner from `smartcore`.
//!
//! - `forest`: binary estimator (positive-class score in `[0, 1]`)
//! - `ova`: one-versus-all multiclass wrapper over `forest`

pub mod forest;
pub mod ova;

pub use forest::*;
pub use ova::*;
