//! Pipeline fitting.
//!
//! Chains the column transforms with the one-versus-all forest into a single
//! trainable/servable unit (`TrainedPipeline`).

pub mod pipeline;

pub use pipeline::*;
