mod allocation;
mod history;
mod results;
mod statistics;

pub use allocation::{
    Allocation, AllocationValue, AssetClass, Holding, HoldingAmount, HoldingWeight, NumberScale,
    TickerWeight, WEIGHT_TOLERANCE,
};
pub use history::{Lookback, PriceHistory, PricePoint, YearMonth};
pub use results::{DEFAULT_LIFE_EXPECTANCY, RetirementOutlook, SimulationResult, YearlyPoint};
pub use statistics::{PeriodStats, ReturnStatistics};
