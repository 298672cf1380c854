//! End-to-end projection: estimate returns from price history, then simulate

use serde::Serialize;

use crate::config::{MarketAssumptions, SimulationRequest};
use crate::error::ProjectionError;
use crate::estimator::{EstimatedReturns, estimate_returns};
use crate::model::SimulationResult;
use crate::provider::PriceHistoryProvider;
use crate::simulation::{MonteCarloProgress, simulate_with_progress};

/// Simulation output together with the statistics it was driven by
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub returns: EstimatedReturns,
    pub result: SimulationResult,
}

/// Estimate returns for the request's allocation and run the simulation.
///
/// Data problems abort before any trial runs.
pub fn project<P: PriceHistoryProvider>(
    request: &SimulationRequest,
    provider: &P,
    market: &MarketAssumptions,
) -> Result<Projection, ProjectionError> {
    project_with_progress(request, provider, market, &MonteCarloProgress::new())
}

pub fn project_with_progress<P: PriceHistoryProvider>(
    request: &SimulationRequest,
    provider: &P,
    market: &MarketAssumptions,
    progress: &MonteCarloProgress,
) -> Result<Projection, ProjectionError> {
    let returns = estimate_returns(request.allocation(), provider, market)?;
    let result = simulate_with_progress(request, &returns.statistics, progress)?;
    Ok(Projection { returns, result })
}
