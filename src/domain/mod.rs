//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the CSV column layout (`Field`, `MIN_COLUMNS`)
//! - the housing record and prediction types (`HouseRecord`, `HousePrediction`)
//! - pipeline settings and the run configuration (`PipelineSettings`, `TrainConfig`)

pub mod types;

pub use types::*;
