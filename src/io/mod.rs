//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - model artifact save/load (`artifact`)
//! - metrics and prediction exports (`export`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
