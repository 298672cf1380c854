use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::config::SimulationRequest;
use crate::error::{ParameterError, ProjectionError};
use crate::model::{AssetClass, PeriodStats, ReturnStatistics, SimulationResult};
use crate::percentiles::PercentileSet;

/// Progress tracking and cancellation for a Monte Carlo run
#[derive(Debug, Clone, Default)]
pub struct MonteCarloProgress {
    /// Completed trials counter
    completed: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from existing atomics shared with a caller's UI or worker
    pub fn from_atomics(completed: Arc<AtomicUsize>, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            completed,
            cancelled,
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Request cancellation; running trials finish, no new trial starts
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Run the Monte Carlo projection for `request` with the given monthly statistics.
///
/// Trials run on rayon's pool when the `parallel` feature is enabled. Results
/// are identical either way because each trial owns a generator seeded from
/// the base seed and its index.
pub fn simulate(
    request: &SimulationRequest,
    stats: &ReturnStatistics,
) -> Result<SimulationResult, ProjectionError> {
    simulate_with_progress(request, stats, &MonteCarloProgress::new())
}

/// [`simulate`] with a shared progress counter and cancellation flag.
///
/// Cancellation is checked before each trial; a cancelled run returns
/// [`ProjectionError::Cancelled`] and no partial result.
pub fn simulate_with_progress(
    request: &SimulationRequest,
    stats: &ReturnStatistics,
    progress: &MonteCarloProgress,
) -> Result<SimulationResult, ProjectionError> {
    let ctx = TrialContext::new(request, stats)?;
    let trajectories = run_trials(&ctx, request.num_trials(), progress)?;
    let result = aggregate(request, ctx.seed, &trajectories)?;

    tracing::info!(
        trials = result.num_trials,
        horizon_months = result.horizon_months(),
        seed = result.seed,
        median_final = result.median_final_value(),
        "projection complete"
    );
    Ok(result)
}

/// Single-threaded run, used to check that parallel execution matches it
#[cfg(test)]
pub(crate) fn simulate_sequential(
    request: &SimulationRequest,
    stats: &ReturnStatistics,
) -> Result<SimulationResult, ProjectionError> {
    let ctx = TrialContext::new(request, stats)?;
    let progress = MonteCarloProgress::new();
    let trajectories = (0..request.num_trials())
        .map(|trial| ctx.run_tracked(trial, &progress))
        .collect::<Result<Vec<_>, _>>()?;
    aggregate(request, ctx.seed, &trajectories)
}

#[cfg(feature = "parallel")]
fn run_trials(
    ctx: &TrialContext,
    num_trials: usize,
    progress: &MonteCarloProgress,
) -> Result<Vec<Vec<f64>>, ProjectionError> {
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    (0..num_trials)
        .into_par_iter()
        .map(|trial| ctx.run_tracked(trial, progress))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_trials(
    ctx: &TrialContext,
    num_trials: usize,
    progress: &MonteCarloProgress,
) -> Result<Vec<Vec<f64>>, ProjectionError> {
    (0..num_trials)
        .map(|trial| ctx.run_tracked(trial, progress))
        .collect()
}

/// Immutable per-run inputs shared by every trial
struct TrialContext {
    seed: u64,
    horizon: usize,
    initial_deposit: f64,
    contribution: f64,
    /// Weight and distribution per class, in draw order
    classes: [(f64, Normal<f64>); 3],
}

impl TrialContext {
    fn new(request: &SimulationRequest, stats: &ReturnStatistics) -> Result<Self, ProjectionError> {
        request.validate()?;
        stats.validate()?;

        let allocation = request.allocation();
        let weighted = |class: AssetClass| -> Result<(f64, Normal<f64>), ProjectionError> {
            Ok((allocation.weight(class), normal(class, stats.get(class))?))
        };
        let classes = [
            weighted(AssetClass::Stock)?,
            weighted(AssetClass::Bond)?,
            weighted(AssetClass::Cash)?,
        ];

        let seed = request.seed().unwrap_or_else(|| rand::rng().random());
        tracing::debug!(
            seed,
            trials = request.num_trials(),
            horizon_months = request.horizon_months(),
            stock = ?stats.stock,
            bond = ?stats.bond,
            cash = ?stats.cash,
            "starting projection"
        );

        Ok(Self {
            seed,
            horizon: request.horizon_months(),
            initial_deposit: request.initial_deposit(),
            contribution: request.monthly_contribution(),
            classes,
        })
    }

    fn run_tracked(
        &self,
        trial: usize,
        progress: &MonteCarloProgress,
    ) -> Result<Vec<f64>, ProjectionError> {
        if progress.is_cancelled() {
            return Err(ProjectionError::Cancelled);
        }
        let values = self.run_trial(trial)?;
        progress.increment();
        Ok(values)
    }

    /// One trajectory of `horizon + 1` values, month 0 is the initial deposit
    fn run_trial(&self, trial: usize) -> Result<Vec<f64>, ProjectionError> {
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(trial as u64));
        let mut values = Vec::with_capacity(self.horizon + 1);
        let mut value = self.initial_deposit;
        values.push(value);

        for month in 1..=self.horizon {
            // Every class is drawn each month, even at zero weight, so the
            // random stream does not depend on the allocation.
            let total: f64 = self
                .classes
                .iter()
                .map(|(weight, dist)| weight * dist.sample(&mut rng))
                .sum();
            value = (value + self.contribution) * (1.0 + total);
            if !value.is_finite() {
                return Err(ProjectionError::NonFiniteProjection { trial, month });
            }
            values.push(value);
        }
        Ok(values)
    }
}

fn normal(class: AssetClass, stats: PeriodStats) -> Result<Normal<f64>, ProjectionError> {
    Normal::new(stats.mean, stats.std_dev).map_err(|_| ProjectionError::InvalidDistribution {
        class,
        mean: stats.mean,
        std_dev: stats.std_dev,
    })
}

fn aggregate(
    request: &SimulationRequest,
    seed: u64,
    trajectories: &[Vec<f64>],
) -> Result<SimulationResult, ProjectionError> {
    let points = request.horizon_months() + 1;
    let mut median = Vec::with_capacity(points);
    let mut optimistic = Vec::with_capacity(points);
    let mut pessimistic = Vec::with_capacity(points);

    let mut column = Vec::with_capacity(trajectories.len());
    for month in 0..points {
        column.clear();
        column.extend(trajectories.iter().map(|t| t[month]));
        let band = PercentileSet::from_samples(&mut column).ok_or(ParameterError::ZeroTrials)?;
        median.push(band.p50);
        optimistic.push(band.p95);
        pessimistic.push(band.p5);
    }

    let mean_final_value =
        trajectories.iter().map(|t| t[points - 1]).sum::<f64>() / trajectories.len() as f64;
    let total_deposited = request.total_deposited();
    let median_final = median.last().copied().unwrap_or(0.0);

    Ok(SimulationResult {
        median,
        optimistic,
        pessimistic,
        total_deposited,
        extra_revenue: median_final - total_deposited,
        mean_final_value,
        seed,
        num_trials: trajectories.len(),
    })
}
