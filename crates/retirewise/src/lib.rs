//! Command-line front end for retirewise_core
//!
//! Reads a supplier portfolio, price histories and optional YAML assumptions,
//! runs the projection and prints a yearly table or the full JSON result.

pub mod cli;
pub mod data;
pub mod logging;
pub mod report;

pub use cli::{Args, run};
pub use logging::init_logging;
