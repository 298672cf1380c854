//! Return estimation from historical prices
//!
//! Stock statistics come from month-end closes resampled from each ticker's
//! history. Returns are simple returns (`p[i] / p[i-1] - 1`). Tickers are
//! combined month by month with their stock sub-weights; a ticker with no
//! return for a given month is left out of that month and the remaining
//! weights are renormalized. Missing months are never zero-filled.
//!
//! Bond and cash statistics are fixed assumptions from
//! [`MarketAssumptions`](crate::config::MarketAssumptions).

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::MarketAssumptions;
use crate::error::{ProjectionError, UnavailableReason};
use crate::model::{
    Allocation, PeriodStats, PriceHistory, ReturnStatistics, TickerWeight, YearMonth,
};
use crate::provider::PriceHistoryProvider;

/// Why a ticker was left out of the stock estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DegradedReason {
    /// The provider returned nothing for the ticker
    NoHistory,
    /// Fewer than two month-end closes, so no return could be computed
    InsufficientHistory { month_ends: usize },
    /// The provider reported an error
    ProviderFailed(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::NoHistory => write!(f, "no price history"),
            DegradedReason::InsufficientHistory { month_ends } => {
                write!(f, "{month_ends} month-end close(s), need at least 2")
            }
            DegradedReason::ProviderFailed(message) => write!(f, "provider error: {message}"),
        }
    }
}

/// A ticker excluded from estimation; the estimate is still usable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedTicker {
    pub ticker: String,
    /// Sub-weight within the stock class that was redistributed
    pub weight: f64,
    pub reason: DegradedReason,
}

/// Stock return statistics with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEstimate {
    pub stats: PeriodStats,
    /// Number of monthly returns in the weighted series
    pub periods: usize,
    pub first_period: YearMonth,
    pub last_period: YearMonth,
    /// Tickers that contributed, with sub-weights renormalized over them
    pub used_tickers: Vec<TickerWeight>,
    pub degraded: Vec<DegradedTicker>,
}

impl StockEstimate {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Statistics for all asset classes, ready for the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedReturns {
    pub statistics: ReturnStatistics,
    /// `None` when the allocation holds no stock
    pub stock: Option<StockEstimate>,
}

impl EstimatedReturns {
    /// Tickers that were dropped from the stock estimate
    #[must_use]
    pub fn degraded(&self) -> &[DegradedTicker] {
        self.stock.as_ref().map_or(&[], |s| s.degraded.as_slice())
    }
}

/// Weighted monthly stock statistics from per-ticker price histories.
///
/// `weights` are stock sub-weights (summing to 1 within the stock class).
/// Tickers without usable history are reported as degraded; if none remain
/// the result is `DataUnavailable`.
pub fn estimate_stock_returns(
    histories: &FxHashMap<String, PriceHistory>,
    weights: &[TickerWeight],
) -> Result<StockEstimate, ProjectionError> {
    let mut degraded = Vec::new();
    let mut usable: Vec<(&TickerWeight, Vec<(YearMonth, f64)>)> = Vec::new();

    for tw in weights.iter().filter(|tw| tw.weight > 0.0) {
        let Some(history) = histories.get(&tw.ticker).filter(|h| !h.is_empty()) else {
            degraded.push(DegradedTicker {
                ticker: tw.ticker.clone(),
                weight: tw.weight,
                reason: DegradedReason::NoHistory,
            });
            continue;
        };

        let returns = history.monthly_returns();
        if returns.is_empty() {
            degraded.push(DegradedTicker {
                ticker: tw.ticker.clone(),
                weight: tw.weight,
                reason: DegradedReason::InsufficientHistory {
                    month_ends: history.month_end_closes().len(),
                },
            });
            continue;
        }
        usable.push((tw, returns));
    }

    if usable.is_empty() {
        return Err(ProjectionError::DataUnavailable {
            tickers: ticker_names(weights),
            reason: UnavailableReason::NoHistory,
        });
    }

    // month -> (sum of weight * return, sum of weight)
    let mut by_month: BTreeMap<YearMonth, (f64, f64)> = BTreeMap::new();
    for (tw, returns) in &usable {
        for (month, r) in returns {
            let entry = by_month.entry(*month).or_insert((0.0, 0.0));
            entry.0 += tw.weight * r;
            entry.1 += tw.weight;
        }
    }

    let weighted: Vec<f64> = by_month.values().map(|(wr, w)| wr / w).collect();
    let stats = PeriodStats::from_sample(&weighted);
    let bounds = by_month.keys().next().zip(by_month.keys().next_back());
    let (Some(stats), Some((&first_period, &last_period))) = (stats, bounds) else {
        return Err(ProjectionError::DataUnavailable {
            tickers: ticker_names(weights),
            reason: UnavailableReason::InsufficientHistory {
                periods: weighted.len(),
            },
        });
    };

    let usable_weight: f64 = usable.iter().map(|(tw, _)| tw.weight).sum();
    let used_tickers = usable
        .iter()
        .map(|(tw, _)| TickerWeight {
            ticker: tw.ticker.clone(),
            weight: tw.weight / usable_weight,
        })
        .collect();

    if !degraded.is_empty() {
        tracing::warn!(
            degraded = ?degraded.iter().map(|d| d.ticker.as_str()).collect::<Vec<_>>(),
            "estimating stock returns without some tickers; remaining weights renormalized"
        );
    }

    Ok(StockEstimate {
        stats,
        periods: weighted.len(),
        first_period,
        last_period,
        used_tickers,
        degraded,
    })
}

fn ticker_names(weights: &[TickerWeight]) -> Vec<String> {
    weights.iter().map(|tw| tw.ticker.clone()).collect()
}

/// Fetch history for every stock ticker once, then estimate all classes.
///
/// All fetches complete before estimation starts. A provider error for a
/// ticker is treated as missing history for that ticker.
pub fn estimate_returns<P: PriceHistoryProvider>(
    allocation: &Allocation,
    provider: &P,
    market: &MarketAssumptions,
) -> Result<EstimatedReturns, ProjectionError> {
    let bond = market.bond_monthly();
    let cash = market.cash_monthly();

    if allocation.stock_weight() <= 0.0 {
        return Ok(EstimatedReturns {
            statistics: ReturnStatistics::new(PeriodStats::ZERO, bond, cash),
            stock: None,
        });
    }

    let weights = allocation.stock_sub_weights();
    if weights.is_empty() {
        return Err(ProjectionError::DataUnavailable {
            tickers: Vec::new(),
            reason: UnavailableReason::NoHistory,
        });
    }

    let mut histories = FxHashMap::default();
    let mut failures = FxHashMap::default();
    for tw in &weights {
        match provider.fetch(&tw.ticker, market.lookback) {
            Ok(history) => {
                tracing::debug!(ticker = %tw.ticker, points = history.len(), "fetched history");
                histories.insert(tw.ticker.clone(), history);
            }
            Err(err) => {
                tracing::warn!(ticker = %tw.ticker, error = %err, "price history fetch failed");
                failures.insert(tw.ticker.clone(), err.message);
            }
        }
    }

    let mut stock = estimate_stock_returns(&histories, &weights)?;
    for entry in &mut stock.degraded {
        if let Some(message) = failures.remove(&entry.ticker) {
            entry.reason = DegradedReason::ProviderFailed(message);
        }
    }

    tracing::debug!(
        mean = stock.stats.mean,
        std_dev = stock.stats.std_dev,
        periods = stock.periods,
        "estimated monthly stock returns"
    );

    Ok(EstimatedReturns {
        statistics: ReturnStatistics::new(stock.stats, bond, cash),
        stock: Some(stock),
    })
}
