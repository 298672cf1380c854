//! Tests for rejected inputs and interrupted runs
//!
//! Invalid inputs must fail before any trial runs, and no partial result is
//! ever returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize};

use super::{fixed_stats, request};
use crate::config::{MarketAssumptions, SimulationRequest};
use crate::error::{AllocationError, ParameterError, ProjectionError, UnavailableReason};
use crate::model::{
    Allocation, AllocationValue, AssetClass, Holding, PeriodStats, ReturnStatistics,
};
use crate::projection::project;
use crate::provider::InMemoryPriceHistory;
use crate::simulation::{MonteCarloProgress, simulate, simulate_with_progress};

#[test]
fn test_weights_not_summing_to_one() {
    let err = Allocation::new(0.5, 0.3, 0.1).unwrap_err();
    let AllocationError::WeightsDoNotSum { total } = err else {
        panic!("expected WeightsDoNotSum");
    };
    assert!((total - 0.9).abs() < 1e-12);
    assert!(matches!(
        ProjectionError::from(err),
        ProjectionError::InvalidAllocation(_)
    ));

    let holdings = vec![
        Holding::new("Growth", Some("QQQ"), AllocationValue::Number(50.0), "Stock"),
        Holding::new("Bonds", Some("BND"), AllocationValue::Number(40.0), "Bond"),
    ];
    assert!(matches!(
        Allocation::from_holdings(&holdings),
        Err(AllocationError::WeightsDoNotSum { .. })
    ));
}

#[test]
fn test_zero_horizon_rejected() {
    let err = SimulationRequest::builder(Allocation::new(0.6, 0.3, 0.1).unwrap())
        .horizon_months(0)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ProjectionError::InvalidParameters(ParameterError::ZeroHorizon)
    );
}

#[test]
fn test_unresolvable_ticker_is_data_unavailable() {
    let allocation = Allocation::with_tickers([("ZZZZ", 1.0)], 0.0, 0.0).unwrap();
    let req = request(allocation, 10_000.0, 500.0, 12, 100, 42);

    let provider = InMemoryPriceHistory::new();
    let err = project(&req, &provider, &MarketAssumptions::default()).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::DataUnavailable {
            tickers: vec!["ZZZZ".to_string()],
            reason: UnavailableReason::NoHistory,
        }
    );
}

#[test]
fn test_invalid_distribution_rejected() {
    let req = request(Allocation::new(0.6, 0.3, 0.1).unwrap(), 1_000.0, 0.0, 12, 10, 1);

    let nan_mean = ReturnStatistics::new(
        PeriodStats::new(f64::NAN, 0.01),
        PeriodStats::ZERO,
        PeriodStats::ZERO,
    );
    assert!(matches!(
        simulate(&req, &nan_mean).unwrap_err(),
        ProjectionError::InvalidDistribution {
            class: AssetClass::Stock,
            ..
        }
    ));

    let negative_std = ReturnStatistics::new(
        PeriodStats::ZERO,
        PeriodStats::ZERO,
        PeriodStats::new(0.001, -0.5),
    );
    assert!(matches!(
        simulate(&req, &negative_std).unwrap_err(),
        ProjectionError::InvalidDistribution {
            class: AssetClass::Cash,
            ..
        }
    ));
}

#[test]
fn test_overflowing_trajectory_rejected() {
    let allocation = Allocation::new(1.0, 0.0, 0.0).unwrap();
    let req = request(allocation, 1e300, 0.0, 3, 1, 1);

    let err = simulate(&req, &fixed_stats(1e300, 0.0, 0.0)).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::NonFiniteProjection { trial: 0, month: 1 }
    );
}

#[test]
fn test_cancelled_before_start() {
    let allocation = Allocation::new(0.6, 0.3, 0.1).unwrap();
    let req = request(allocation, 1_000.0, 10.0, 24, 500, 3);
    let progress = MonteCarloProgress::new();
    progress.cancel();

    let err = simulate_with_progress(&req, &fixed_stats(0.01, 0.0, 0.0), &progress).unwrap_err();
    assert_eq!(err, ProjectionError::Cancelled);
    assert_eq!(progress.completed(), 0);
}

#[test]
fn test_progress_counts_every_trial() {
    let completed = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicBool::new(false));
    let progress = MonteCarloProgress::from_atomics(completed.clone(), cancelled);

    let allocation = Allocation::new(0.6, 0.3, 0.1).unwrap();
    let req = request(allocation, 1_000.0, 10.0, 12, 321, 3);
    simulate_with_progress(&req, &fixed_stats(0.01, 0.002, 0.001), &progress).unwrap();

    assert_eq!(progress.completed(), 321);
    assert_eq!(completed.load(std::sync::atomic::Ordering::Relaxed), 321);

    progress.reset();
    assert_eq!(progress.completed(), 0);
    assert!(!progress.is_cancelled());
}
