//! Dataset handling that sits between ingest and fitting.

pub mod split;

pub use split::*;
