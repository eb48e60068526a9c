//! Column transforms applied before the learner.
//!
//! - missing-value replacement (`impute`)
//! - feature-vector concatenation (`features`)
//! - sale-price value <-> class key mapping (`label`)

pub mod features;
pub mod impute;
pub mod label;

pub use features::*;
pub use impute::*;
pub use label::*;
