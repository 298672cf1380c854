//! Criterion benchmarks for retirewise_core projections
//!
//! Run with: cargo bench -p retirewise_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jiff::ToSpan;
use jiff::civil::date;
use retirewise_core::config::{MarketAssumptions, SimulationRequest};
use retirewise_core::estimator::estimate_returns;
use retirewise_core::model::{Allocation, PeriodStats, PriceHistory, ReturnStatistics};
use retirewise_core::provider::InMemoryPriceHistory;
use retirewise_core::simulation::simulate;

fn balanced_stats() -> ReturnStatistics {
    ReturnStatistics::new(
        PeriodStats::new(0.008, 0.04),
        PeriodStats::new(0.0029, 0.0173),
        PeriodStats::new(0.00125, 0.0029),
    )
}

fn create_request(years: usize, trials: usize) -> SimulationRequest {
    let allocation = Allocation::new(0.6, 0.3, 0.1).expect("valid allocation");
    SimulationRequest::builder(allocation)
        .initial_deposit(10_000.0)
        .monthly_contribution(500.0)
        .horizon_years(years)
        .num_trials(trials)
        .seed(42)
        .build()
        .expect("valid request")
}

/// Twenty years of business-day prices for a handful of tickers
fn create_provider(tickers: &[&str]) -> InMemoryPriceHistory {
    let start = date(2005, 1, 3);
    tickers
        .iter()
        .enumerate()
        .map(|(i, ticker)| {
            let drift = 1.0 + 0.0002 * (i as f64 + 1.0);
            let mut price = 100.0;
            let history = PriceHistory::from_pairs((0..5_000).map(|d: i64| {
                price *= if d % 7 == 0 { 0.99 } else { drift };
                (start.saturating_add(d.days()), price)
            }));
            (ticker.to_string(), history)
        })
        .collect()
}

fn bench_single_projection(c: &mut Criterion) {
    let request = create_request(30, 1000);
    let stats = balanced_stats();

    c.bench_function("balanced_30yr_1000_trials", |b| {
        b.iter(|| simulate(black_box(&request), black_box(&stats)))
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    let stats = balanced_stats();

    for trials in [100, 500, 1000, 5000].iter() {
        let request = create_request(30, *trials);
        group.bench_with_input(BenchmarkId::new("trials", trials), trials, |b, _| {
            b.iter(|| simulate(black_box(&request), black_box(&stats)))
        });
    }

    group.finish();
}

fn bench_estimation(c: &mut Criterion) {
    let tickers = ["VTI", "VXUS", "QQQ", "ICLN", "ESGV"];
    let provider = create_provider(&tickers);
    let allocation = Allocation::with_tickers(tickers.iter().map(|t| (*t, 0.12)), 0.3, 0.1)
        .expect("valid allocation");
    let market = MarketAssumptions::default();

    c.bench_function("estimate_returns_5_tickers_daily", |b| {
        b.iter(|| estimate_returns(&allocation, black_box(&provider), &market))
    });
}

criterion_group!(
    benches,
    bench_single_projection,
    bench_monte_carlo,
    bench_estimation,
);
criterion_main!(benches);
