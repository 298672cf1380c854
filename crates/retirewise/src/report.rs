//! Text and JSON rendering of a projection

use std::fmt;

use retirewise_core::Projection;
use retirewise_core::model::{AssetClass, HoldingAmount, RetirementOutlook};
use serde::Serialize;

/// Everything printed for one run
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub portfolio_name: Option<String>,
    pub initial_deposit: f64,
    pub monthly_contribution: f64,
    /// Weight per class in Stock, Bond, Cash order
    pub allocation: [(AssetClass, f64); 3],
    pub holdings: Vec<HoldingAmount>,
    #[serde(flatten)]
    pub projection: Projection,
    /// Present when the retirement age is known and below life expectancy
    pub outlook: Option<RetirementOutlook>,
}

impl ProjectionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn year_label(month: usize) -> String {
    if month % 12 == 0 {
        format!("{}", month / 12)
    } else {
        format!("{}y{}m", month / 12, month % 12)
    }
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.projection.result;

        if let Some(name) = &self.portfolio_name {
            writeln!(f, "Portfolio: {name}")?;
        }
        writeln!(
            f,
            "Horizon: {} months, {} trials, seed {}",
            result.horizon_months(),
            result.num_trials,
            result.seed
        )?;

        let classes: Vec<String> = self
            .allocation
            .iter()
            .map(|(class, weight)| format!("{class} {:.1}%", weight * 100.0))
            .collect();
        writeln!(f, "Allocation: {}", classes.join(", "))?;

        writeln!(f)?;
        writeln!(
            f,
            "{:<36} {:>6} {:>8} {:>12} {:>10}",
            "Holding", "Class", "Weight", "Initial", "Monthly"
        )?;
        for h in &self.holdings {
            let name = match &h.ticker {
                Some(ticker) => format!("{} ({ticker})", h.asset_name),
                None => h.asset_name.clone(),
            };
            writeln!(
                f,
                "{:<36} {:>6} {:>7.1}% {:>12.2} {:>10.2}",
                name,
                h.class,
                h.weight * 100.0,
                h.initial,
                h.monthly
            )?;
        }

        let stats = &self.projection.returns.statistics;
        writeln!(f)?;
        writeln!(
            f,
            "Monthly returns: stock {:.4}±{:.4}, bond {:.4}±{:.4}, cash {:.4}±{:.4}",
            stats.stock.mean,
            stats.stock.std_dev,
            stats.bond.mean,
            stats.bond.std_dev,
            stats.cash.mean,
            stats.cash.std_dev
        )?;
        if let Some(stock) = &self.projection.returns.stock {
            writeln!(
                f,
                "Stock history: {} monthly returns ({}-{:02} to {}-{:02})",
                stock.periods,
                stock.first_period.year,
                stock.first_period.month,
                stock.last_period.year,
                stock.last_period.month
            )?;
        }
        for degraded in self.projection.returns.degraded() {
            writeln!(f, "Excluded {}: {}", degraded.ticker, degraded.reason)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:>8} {:>16} {:>16} {:>16}",
            "Year", "Pessimistic", "Median", "Optimistic"
        )?;
        for point in result.yearly_points() {
            writeln!(
                f,
                "{:>8} {:>16.2} {:>16.2} {:>16.2}",
                year_label(point.month),
                point.band.p5,
                point.band.p50,
                point.band.p95
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Total deposited:     {:>16.2}", result.total_deposited)?;
        let median_final = result.median_final_value();
        writeln!(f, "Median final value:  {median_final:>16.2}")?;
        writeln!(f, "Extra revenue:       {:>16.2}", result.extra_revenue)?;
        writeln!(f, "Mean final value:    {:>16.2}", result.mean_final_value)?;

        if let Some(outlook) = &self.outlook {
            write!(
                f,
                "Monthly withdrawal from age {} to {}: ",
                outlook.retirement_age,
                outlook.life_expectancy
            )?;
            let withdrawal = &outlook.monthly_withdrawal;
            writeln!(
                f,
                "{:.2} (pessimistic {:.2}, optimistic {:.2})",
                withdrawal.p50,
                withdrawal.p5,
                withdrawal.p95
            )?;
        }
        Ok(())
    }
}
