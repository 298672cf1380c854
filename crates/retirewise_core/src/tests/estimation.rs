//! Tests for estimating returns through a price provider
//!
//! These tests verify that:
//! - Daily prices are resampled to month ends before returns are taken
//! - The lookback window limits the history used
//! - Holdings parsed from supplier records drive the stock sub-weights

use jiff::ToSpan;
use jiff::civil::{Date, date};

use crate::config::MarketAssumptions;
use crate::estimator::estimate_returns;
use crate::model::{Allocation, AllocationValue, Holding, Lookback, PeriodStats, PriceHistory};
use crate::provider::InMemoryPriceHistory;

/// Business-day prices growing by a fixed monthly factor, flat within each month
fn daily_history(start: Date, months: i32, monthly_growth: f64) -> PriceHistory {
    let mut pairs = Vec::new();
    let mut price = 100.0;
    for m in 0..months {
        let month_start = start.checked_add(m.months()).unwrap();
        for day in 0..20 {
            pairs.push((month_start.checked_add(day.days()).unwrap(), price));
        }
        price *= 1.0 + monthly_growth;
    }
    PriceHistory::from_pairs(pairs)
}

#[test]
fn test_daily_prices_resample_to_monthly_returns() {
    let provider =
        InMemoryPriceHistory::new().with("FLAT", daily_history(date(2015, 1, 1), 24, 0.01));
    let allocation = Allocation::with_tickers([("FLAT", 0.5)], 0.5, 0.0).unwrap();

    let estimated =
        estimate_returns(&allocation, &provider, &MarketAssumptions::default()).unwrap();
    let stock = estimated.stock.as_ref().unwrap();

    assert_eq!(stock.periods, 23);
    assert!((estimated.statistics.stock.mean - 0.01).abs() < 1e-12);
    assert!(estimated.statistics.stock.std_dev < 1e-12);
}

#[test]
fn test_lookback_limits_history() {
    // Ten years of history: the first five flat, the last five growing 2% a month
    let mut pairs: Vec<(Date, f64)> = Vec::new();
    let mut price = 50.0;
    for m in 0..120 {
        let day = date(2014, 1, 28).checked_add(m.months()).unwrap();
        if m >= 60 {
            price *= 1.02;
        }
        pairs.push((day, price));
    }
    let last = pairs[pairs.len() - 1].0;
    let provider = InMemoryPriceHistory::new().with("GROW", PriceHistory::from_pairs(pairs));
    let allocation = Allocation::with_tickers([("GROW", 1.0)], 0.0, 0.0).unwrap();

    let full = estimate_returns(&allocation, &provider, &MarketAssumptions::default()).unwrap();
    let recent = estimate_returns(
        &allocation,
        &provider,
        &MarketAssumptions {
            lookback: Lookback::Years(3),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(full.statistics.stock.mean < 0.02);
    assert!((recent.statistics.stock.mean - 0.02).abs() < 1e-12);
    assert_eq!(recent.stock.as_ref().unwrap().last_period.year, last.year());
}

#[test]
fn test_supplier_holdings_drive_sub_weights() {
    let text = |s: &str| AllocationValue::Text(s.to_string());
    let number = AllocationValue::Number;
    let holdings = vec![
        Holding::new("Total Market", Some("vti"), text("40%"), "Stocks"),
        Holding::new("Clean Energy", Some("ICLN"), text("20%"), "stock"),
        Holding::new("Aggregate Bond", Some("AGG"), number(30.0), "Bonds"),
        Holding::new("Money Market", None, number(10.0), "Cash"),
    ];
    let allocation = Allocation::from_holdings(&holdings).unwrap();

    let provider = InMemoryPriceHistory::new()
        .with("VTI", daily_history(date(2018, 1, 1), 36, 0.01))
        .with("ICLN", daily_history(date(2018, 1, 1), 36, 0.04));

    let estimated =
        estimate_returns(&allocation, &provider, &MarketAssumptions::default()).unwrap();

    // Sub-weights within stock: 2/3 VTI, 1/3 ICLN
    let expected_mean = 2.0 / 3.0 * 0.01 + 1.0 / 3.0 * 0.04;
    assert!((estimated.statistics.stock.mean - expected_mean).abs() < 1e-12);
    assert!(estimated.degraded().is_empty());
    assert_eq!(
        estimated.statistics.bond,
        PeriodStats::from_annual(0.035, 0.06)
    );
}
