//! Projection results
//!
//! A `SimulationResult` is produced once per request and never mutated. It
//! carries the three percentile series plus the derived deposit and gain
//! figures consumers usually display next to a chart.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, ProjectionError};
use crate::percentiles::PercentileSet;

/// Default age used to spread the final value over retirement
pub const DEFAULT_LIFE_EXPECTANCY: u32 = 80;

/// Percentile series over the projection horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Median portfolio value per month, month 0 = initial deposit
    pub median: Vec<f64>,
    /// 95th percentile per month
    pub optimistic: Vec<f64>,
    /// 5th percentile per month
    pub pessimistic: Vec<f64>,
    /// `initial_deposit + monthly_contribution * horizon_months`
    pub total_deposited: f64,
    /// Median final value minus total deposited
    pub extra_revenue: f64,
    /// Arithmetic mean of the final values across trials
    pub mean_final_value: f64,
    /// Base seed the trials were derived from
    pub seed: u64,
    pub num_trials: usize,
}

/// One row of a compact yearly report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyPoint {
    pub month: usize,
    pub band: PercentileSet,
}

impl SimulationResult {
    #[must_use]
    pub fn horizon_months(&self) -> usize {
        self.median.len().saturating_sub(1)
    }

    #[must_use]
    pub fn median_final_value(&self) -> f64 {
        self.median.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn optimistic_final_value(&self) -> f64 {
        self.optimistic.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn pessimistic_final_value(&self) -> f64 {
        self.pessimistic.last().copied().unwrap_or(0.0)
    }

    /// Percentile band at a month index
    #[must_use]
    pub fn band_at(&self, month: usize) -> Option<PercentileSet> {
        Some(PercentileSet {
            p5: *self.pessimistic.get(month)?,
            p50: *self.median.get(month)?,
            p95: *self.optimistic.get(month)?,
        })
    }

    #[must_use]
    pub fn final_band(&self) -> Option<PercentileSet> {
        self.band_at(self.horizon_months())
    }

    /// Month 0, every twelfth month, and the final month if it is not a year boundary
    #[must_use]
    pub fn yearly_points(&self) -> Vec<YearlyPoint> {
        let horizon = self.horizon_months();
        let mut months: Vec<usize> = (0..=horizon).step_by(12).collect();
        if horizon % 12 != 0 {
            months.push(horizon);
        }
        months
            .into_iter()
            .filter_map(|month| {
                let band = self.band_at(month)?;
                Some(YearlyPoint { month, band })
            })
            .collect()
    }
}

/// Monthly income the projected final values could fund in retirement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementOutlook {
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub months_in_retirement: u32,
    /// Final value divided evenly over the retirement months
    pub monthly_withdrawal: PercentileSet,
}

impl RetirementOutlook {
    /// Spread the final median/optimistic/pessimistic values evenly over
    /// `(life_expectancy - retirement_age) * 12` months. Growth during
    /// retirement is ignored.
    pub fn from_result(
        result: &SimulationResult,
        retirement_age: u32,
        life_expectancy: u32,
    ) -> Result<Self, ProjectionError> {
        if retirement_age >= life_expectancy {
            return Err(ParameterError::RetirementNotBeforeLifeExpectancy {
                retirement_age,
                life_expectancy,
            }
            .into());
        }
        let months_in_retirement = (life_expectancy - retirement_age) * 12;
        let months = f64::from(months_in_retirement);

        Ok(Self {
            retirement_age,
            life_expectancy,
            months_in_retirement,
            monthly_withdrawal: PercentileSet {
                p5: result.pessimistic_final_value() / months,
                p50: result.median_final_value() / months,
                p95: result.optimistic_final_value() / months,
            },
        })
    }
}
