//! Engine-level tests for the projection pipeline
//!
//! Tests are organized by topic:
//! - `basic` - Trial mechanics, determinism and derived figures
//! - `estimation` - Price history through the provider into return statistics
//! - `failures` - Validation, unavailable data and cancellation
//! - `scenario` - Realistic portfolios end to end
//! - `properties` - Property tests across seeds and parameters

mod estimation;
mod failures;
mod scenario;

use crate::config::SimulationRequest;
use crate::model::{Allocation, PeriodStats, ReturnStatistics};

/// Statistics with no volatility in any class
fn fixed_stats(stock: f64, bond: f64, cash: f64) -> ReturnStatistics {
    ReturnStatistics::new(
        PeriodStats::new(stock, 0.0),
        PeriodStats::new(bond, 0.0),
        PeriodStats::new(cash, 0.0),
    )
}

fn request(
    allocation: Allocation,
    initial: f64,
    monthly: f64,
    months: usize,
    trials: usize,
    seed: u64,
) -> SimulationRequest {
    SimulationRequest::builder(allocation)
        .initial_deposit(initial)
        .monthly_contribution(monthly)
        .horizon_months(months)
        .num_trials(trials)
        .seed(seed)
        .build()
        .unwrap()
}
