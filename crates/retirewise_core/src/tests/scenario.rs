//! Realistic portfolios run end to end

use jiff::ToSpan;
use jiff::civil::date;

use super::request;
use crate::config::MarketAssumptions;
use crate::model::{
    Allocation, DEFAULT_LIFE_EXPECTANCY, Holding, PeriodStats, PriceHistory, ReturnStatistics,
    RetirementOutlook,
};
use crate::projection::project;
use crate::provider::InMemoryPriceHistory;
use crate::simulation::simulate;

/// Median final value of the balanced scenario with seed 42 and 1000 trials
const BALANCED_MEDIAN_FINAL: f64 = 16_918.419_592_788_734;

/// 60/30/10 with one year of contributions
#[test]
fn test_balanced_one_year_scenario() {
    let allocation = Allocation::new(0.6, 0.3, 0.1).unwrap();
    let stats = ReturnStatistics::new(
        PeriodStats::new(0.008, 0.04),
        PeriodStats::new(0.0029, 0.0173),
        PeriodStats::new(0.00125, 0.0029),
    );
    let req = request(allocation, 10_000.0, 500.0, 12, 1000, 42);

    let result = simulate(&req, &stats).unwrap();

    assert_eq!(result.total_deposited, 16_000.0);
    let median_final = result.median_final_value();
    assert!((15_000.0..=18_000.0).contains(&median_final));
    // Frozen: changes to seeding, draw order or interpolation move this value
    assert!(
        ((median_final - BALANCED_MEDIAN_FINAL) / BALANCED_MEDIAN_FINAL).abs() < 1e-9,
        "median final value {median_final} drifted from {BALANCED_MEDIAN_FINAL}"
    );
    assert!((result.extra_revenue - (median_final - 16_000.0)).abs() < 1e-9);

    for month in 0..=12 {
        assert!(result.pessimistic[month] <= result.median[month]);
        assert!(result.median[month] <= result.optimistic[month]);
    }
    assert!(result.pessimistic_final_value() < result.optimistic_final_value());
}

/// Supplier JSON through estimation, simulation and the retirement outlook
#[test]
fn test_supplier_portfolio_to_retirement_outlook() {
    let holdings: Vec<Holding> = serde_json::from_str(
        r#"[
            {"asset_name": "Vanguard Total Stock Market", "ticker": "VTI", "allocation": "45%",
             "category": "Stocks", "rationale": "Broad market exposure"},
            {"asset_name": "iShares Global Clean Energy", "ticker": "ICLN", "allocation": "15%",
             "category": "Stocks", "rationale": "Aligned with ethical values"},
            {"asset_name": "Vanguard Total Bond Market", "ticker": "BND", "allocation": "30%",
             "category": "Bonds", "rationale": "Stability"},
            {"asset_name": "High-yield savings", "allocation": "10%", "category": "Cash",
             "rationale": "Liquidity"}
        ]"#,
    )
    .unwrap();
    let allocation = Allocation::from_holdings(&holdings).unwrap();

    // Five years of month-end closes with alternating good and bad months
    let history = |up: f64, down: f64| {
        let mut price = 100.0;
        PriceHistory::from_pairs((0..60).map(|m: i32| {
            let day = date(2019, 1, 31).saturating_add(m.months());
            if m > 0 {
                price *= if m % 2 == 0 { 1.0 + up } else { 1.0 - down };
            }
            (day, price)
        }))
    };
    let provider = InMemoryPriceHistory::new()
        .with("VTI", history(0.04, 0.02))
        .with("ICLN", history(0.07, 0.05));

    let req = crate::config::SimulationRequest::builder(allocation)
        .initial_deposit(20_000.0)
        .monthly_contribution(750.0)
        .retirement(35, 65)
        .num_trials(400)
        .seed(2024)
        .build()
        .unwrap();

    let projection = project(&req, &provider, &MarketAssumptions::default()).unwrap();
    let result = &projection.result;

    assert_eq!(result.horizon_months(), 360);
    assert_eq!(result.total_deposited, 20_000.0 + 750.0 * 360.0);
    assert!(projection.returns.degraded().is_empty());
    assert!(projection.returns.statistics.stock.std_dev > 0.0);
    assert!(result.median_final_value() > result.total_deposited);

    let yearly = result.yearly_points();
    assert_eq!(yearly.len(), 31);
    assert_eq!(yearly[0].band.p50, 20_000.0);

    let outlook = RetirementOutlook::from_result(result, 65, DEFAULT_LIFE_EXPECTANCY).unwrap();
    assert_eq!(outlook.months_in_retirement, 180);
    assert!((outlook.monthly_withdrawal.p50 * 180.0 - result.median_final_value()).abs() < 1e-6);
    assert!(outlook.monthly_withdrawal.p5 <= outlook.monthly_withdrawal.p95);
}
