use std::fmt;

use crate::model::AssetClass;

/// Errors raised while turning supplier holdings into a typed `Allocation`
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// No holdings were supplied
    EmptyPortfolio,
    /// An allocation value could not be read as a percentage or fraction
    UnparseableWeight { asset: String, value: String },
    /// A weight is negative, NaN or infinite
    InvalidWeight { asset: String, weight: f64 },
    /// The category string is not one of Stock/Bond/Cash
    UnknownCategory { asset: String, category: String },
    /// Stock holdings must carry a ticker
    MissingTicker { asset: String },
    /// Class weights do not add up to 1.0 within tolerance
    WeightsDoNotSum { total: f64 },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::EmptyPortfolio => write!(f, "portfolio has no holdings"),
            AllocationError::UnparseableWeight { asset, value } => {
                write!(f, "allocation {value:?} for {asset} is not a percentage")
            }
            AllocationError::InvalidWeight { asset, weight } => {
                write!(f, "weight {weight} for {asset} must be finite and non-negative")
            }
            AllocationError::UnknownCategory { asset, category } => {
                write!(f, "unknown category {category:?} for {asset}")
            }
            AllocationError::MissingTicker { asset } => {
                write!(f, "stock holding {asset} has no ticker")
            }
            AllocationError::WeightsDoNotSum { total } => {
                write!(f, "allocation weights sum to {total}, expected 1.0")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Errors for request parameters that are out of range
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    ZeroHorizon,
    HorizonTooLong { years: usize },
    ZeroTrials,
    NegativeAmount { field: &'static str, value: f64 },
    NonFiniteAmount { field: &'static str },
    RetirementNotAfterCurrentAge {
        current_age: u32,
        retirement_age: u32,
    },
    RetirementNotBeforeLifeExpectancy {
        retirement_age: u32,
        life_expectancy: u32,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::ZeroHorizon => write!(f, "horizon must be at least one month"),
            ParameterError::HorizonTooLong { years } => {
                write!(f, "horizon of {years} years does not fit in months")
            }
            ParameterError::ZeroTrials => write!(f, "at least one trial is required"),
            ParameterError::NegativeAmount { field, value } => {
                write!(f, "{field} must be non-negative (got {value})")
            }
            ParameterError::NonFiniteAmount { field } => write!(f, "{field} must be finite"),
            ParameterError::RetirementNotAfterCurrentAge {
                current_age,
                retirement_age,
            } => write!(
                f,
                "retirement age {retirement_age} must be greater than current age {current_age}"
            ),
            ParameterError::RetirementNotBeforeLifeExpectancy {
                retirement_age,
                life_expectancy,
            } => write!(
                f,
                "retirement age {retirement_age} must be less than \
                 life expectancy {life_expectancy}"
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

/// Why estimated stock statistics could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// None of the tickers returned any usable price history
    NoHistory,
    /// Fewer than two return periods survived, so dispersion is undefined
    InsufficientHistory { periods: usize },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NoHistory => write!(f, "no usable price history"),
            UnavailableReason::InsufficientHistory { periods } => {
                write!(f, "only {periods} monthly return(s) available, need at least 2")
            }
        }
    }
}

/// Errors returned by the projection engine
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    InvalidAllocation(AllocationError),
    InvalidParameters(ParameterError),
    InvalidDistribution {
        class: AssetClass,
        mean: f64,
        std_dev: f64,
    },
    DataUnavailable {
        tickers: Vec<String>,
        reason: UnavailableReason,
    },
    /// A trajectory produced NaN or infinity
    NonFiniteProjection { trial: usize, month: usize },
    /// Projection was cancelled by request
    Cancelled,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::InvalidAllocation(e) => write!(f, "invalid allocation: {e}"),
            ProjectionError::InvalidParameters(e) => write!(f, "invalid parameters: {e}"),
            ProjectionError::InvalidDistribution {
                class,
                mean,
                std_dev,
            } => write!(
                f,
                "invalid {class} return parameters (mean={mean}, std_dev={std_dev}): \
                 both must be finite and std_dev non-negative"
            ),
            ProjectionError::DataUnavailable { tickers, reason } => {
                let tickers = tickers.join(", ");
                write!(f, "stock data unavailable for [{tickers}]: {reason}")
            }
            ProjectionError::NonFiniteProjection { trial, month } => {
                write!(f, "trial {trial} produced a non-finite value at month {month}")
            }
            ProjectionError::Cancelled => write!(f, "projection cancelled"),
        }
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::InvalidAllocation(e) => Some(e),
            ProjectionError::InvalidParameters(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocationError> for ProjectionError {
    fn from(err: AllocationError) -> Self {
        ProjectionError::InvalidAllocation(err)
    }
}

impl From<ParameterError> for ProjectionError {
    fn from(err: ParameterError) -> Self {
        ProjectionError::InvalidParameters(err)
    }
}

/// Failure reported by a price-history provider for a single ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub ticker: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "price history for {}: {}", self.ticker, self.message)
    }
}

impl std::error::Error for ProviderError {}

pub type Result<T> = std::result::Result<T, ProjectionError>;
