//! `house-price` library crate.
//!
//! The binary (`house-price`) is a thin wrapper around this library so that:
//!
//! - every pipeline step is testable without spawning processes
//! - the trained pipeline can be reused by other front-ends
//! - the ML library calls stay behind a small set of typed wrappers

pub mod app;
pub mod cli;
pub mod console;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
pub mod transform;
