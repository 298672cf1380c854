//! Per-period return statistics consumed by the simulator

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::model::AssetClass;

/// Mean and standard deviation of a monthly return
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl PeriodStats {
    pub const ZERO: PeriodStats = PeriodStats {
        mean: 0.0,
        std_dev: 0.0,
    };

    #[must_use]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Convert annual figures to monthly: `mean / 12`, `std_dev / sqrt(12)`
    #[must_use]
    pub fn from_annual(annual_mean: f64, annual_std_dev: f64) -> Self {
        Self {
            mean: annual_mean / 12.0,
            std_dev: annual_std_dev / 12.0_f64.sqrt(),
        }
    }

    /// Arithmetic mean and sample (N-1) standard deviation of a series.
    ///
    /// Returns `None` for fewer than two observations.
    #[must_use]
    pub fn from_sample(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub(crate) fn validate(self, class: AssetClass) -> Result<Self, ProjectionError> {
        if !self.mean.is_finite() || !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(ProjectionError::InvalidDistribution {
                class,
                mean: self.mean,
                std_dev: self.std_dev,
            });
        }
        Ok(self)
    }
}

/// Monthly return statistics for each asset class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    pub stock: PeriodStats,
    pub bond: PeriodStats,
    pub cash: PeriodStats,
}

impl ReturnStatistics {
    #[must_use]
    pub fn new(stock: PeriodStats, bond: PeriodStats, cash: PeriodStats) -> Self {
        Self { stock, bond, cash }
    }

    #[must_use]
    pub fn get(&self, class: AssetClass) -> PeriodStats {
        match class {
            AssetClass::Stock => self.stock,
            AssetClass::Bond => self.bond,
            AssetClass::Cash => self.cash,
        }
    }

    /// Check every class has finite parameters and a non-negative deviation
    pub fn validate(&self) -> Result<(), ProjectionError> {
        for class in AssetClass::ALL {
            self.get(class).validate(class)?;
        }
        Ok(())
    }
}
