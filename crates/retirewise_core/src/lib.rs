//! Retirement portfolio projection library
//!
//! This crate projects how a stock/bond/cash portfolio might grow under
//! monthly contributions. It supports:
//! - Validated allocations built from supplier holdings (`"60%"` or `0.6` weights)
//! - Stock return statistics estimated from month-end price history
//! - Fixed bond and cash assumptions from configuration
//! - Seeded, reproducible Monte Carlo trials (parallel with the `parallel` feature)
//! - Median, optimistic (95th) and pessimistic (5th) percentile series
//!
//! # Example
//!
//! ```ignore
//! use retirewise_core::{project, InMemoryPriceHistory, MarketAssumptions};
//! use retirewise_core::config::SimulationRequest;
//! use retirewise_core::model::Allocation;
//!
//! let allocation = Allocation::with_tickers([("VTI", 0.6)], 0.3, 0.1)?;
//! let request = SimulationRequest::builder(allocation)
//!     .initial_deposit(10_000.0)
//!     .monthly_contribution(500.0)
//!     .horizon_years(30)
//!     .seed(42)
//!     .build()?;
//!
//! let projection = project(&request, &provider, &MarketAssumptions::default())?;
//! println!("median at retirement: {:.0}", projection.result.median_final_value());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod estimator;
pub mod percentiles;
pub mod projection;
pub mod provider;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{MarketAssumptions, ProjectionConfig, SimulationRequest};
pub use error::{ProjectionError, Result};
pub use estimator::{EstimatedReturns, estimate_returns};
pub use projection::{Projection, project, project_with_progress};
pub use provider::{InMemoryPriceHistory, PriceHistoryProvider};
pub use simulation::{MonteCarloProgress, simulate, simulate_with_progress};
