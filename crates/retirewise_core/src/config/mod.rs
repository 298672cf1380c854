//! Projection configuration
//!
//! `ProjectionConfig` holds the assumptions that are not derived from market
//! data: fixed bond and cash return assumptions, how much price history to
//! request, and defaults for the Monte Carlo run. Every field has a serde
//! default so a partial YAML/JSON document is enough.
//!
//! Per-run inputs live in [`SimulationRequest`], built through
//! [`SimulationRequestBuilder`]:
//!
//! ```ignore
//! use retirewise_core::config::SimulationRequest;
//! use retirewise_core::model::Allocation;
//!
//! let request = SimulationRequest::builder(Allocation::new(0.6, 0.3, 0.1)?)
//!     .initial_deposit(10_000.0)
//!     .monthly_contribution(500.0)
//!     .retirement(30, 65)
//!     .seed(42)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{Lookback, PeriodStats};

pub mod request;

pub use request::{SimulationRequest, SimulationRequestBuilder};

/// Recommended number of trials for stable percentiles
pub const DEFAULT_NUM_TRIALS: usize = 1000;

fn default_num_trials() -> usize {
    DEFAULT_NUM_TRIALS
}

fn default_life_expectancy() -> u32 {
    crate::model::DEFAULT_LIFE_EXPECTANCY
}

fn default_bond() -> AnnualAssumption {
    AnnualAssumption::DEFAULT_BOND
}

fn default_cash() -> AnnualAssumption {
    AnnualAssumption::DEFAULT_CASH
}

/// Annual mean and standard deviation of a fixed-assumption asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualAssumption {
    pub mean: f64,
    pub std_dev: f64,
}

impl AnnualAssumption {
    /// Bonds: 3.5% mean, 6% standard deviation per year
    pub const DEFAULT_BOND: AnnualAssumption = AnnualAssumption {
        mean: 0.035,
        std_dev: 0.06,
    };

    /// Cash: 1.5% mean, 1% standard deviation per year
    pub const DEFAULT_CASH: AnnualAssumption = AnnualAssumption {
        mean: 0.015,
        std_dev: 0.01,
    };

    #[must_use]
    pub fn monthly(&self) -> PeriodStats {
        PeriodStats::from_annual(self.mean, self.std_dev)
    }
}

/// Market assumptions that do not come from price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAssumptions {
    #[serde(default = "default_bond")]
    pub bond: AnnualAssumption,
    #[serde(default = "default_cash")]
    pub cash: AnnualAssumption,
    /// Window of stock history requested from the price provider
    #[serde(default)]
    pub lookback: Lookback,
}

impl Default for MarketAssumptions {
    fn default() -> Self {
        Self {
            bond: AnnualAssumption::DEFAULT_BOND,
            cash: AnnualAssumption::DEFAULT_CASH,
            lookback: Lookback::Max,
        }
    }
}

impl MarketAssumptions {
    #[must_use]
    pub fn bond_monthly(&self) -> PeriodStats {
        self.bond.monthly()
    }

    #[must_use]
    pub fn cash_monthly(&self) -> PeriodStats {
        self.cash.monthly()
    }
}

/// Defaults applied to a run when the caller does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDefaults {
    #[serde(default = "default_num_trials")]
    pub num_trials: usize,
    /// Fixed seed for reproducible output; `None` draws a fresh seed per run
    #[serde(default)]
    pub seed: Option<u64>,
    /// Age used to spread the final value into a monthly withdrawal
    #[serde(default = "default_life_expectancy")]
    pub life_expectancy: u32,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_NUM_TRIALS,
            seed: None,
            life_expectancy: default_life_expectancy(),
        }
    }
}

/// Complete projection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub market: MarketAssumptions,
    #[serde(default)]
    pub defaults: ProjectionDefaults,
}
