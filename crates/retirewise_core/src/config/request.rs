//! Simulation request and its builder

use serde::Serialize;

use super::{DEFAULT_NUM_TRIALS, ProjectionDefaults};
use crate::error::{ParameterError, ProjectionError};
use crate::model::Allocation;

/// Validated inputs for one projection run.
///
/// Fields are private; a request can only be created through
/// [`SimulationRequest::builder`], which rejects out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    allocation: Allocation,
    initial_deposit: f64,
    monthly_contribution: f64,
    horizon_months: usize,
    num_trials: usize,
    seed: Option<u64>,
}

impl SimulationRequest {
    #[must_use]
    pub fn builder(allocation: Allocation) -> SimulationRequestBuilder {
        SimulationRequestBuilder::new(allocation)
    }

    #[must_use]
    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    #[must_use]
    pub fn initial_deposit(&self) -> f64 {
        self.initial_deposit
    }

    #[must_use]
    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    #[must_use]
    pub fn horizon_months(&self) -> usize {
        self.horizon_months
    }

    #[must_use]
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Initial deposit plus every monthly contribution over the horizon
    #[must_use]
    pub fn total_deposited(&self) -> f64 {
        self.initial_deposit + self.monthly_contribution * self.horizon_months as f64
    }

    pub(crate) fn validate(&self) -> Result<(), ProjectionError> {
        check_amount("initial_deposit", self.initial_deposit)?;
        check_amount("monthly_contribution", self.monthly_contribution)?;
        if self.horizon_months == 0 {
            return Err(ParameterError::ZeroHorizon.into());
        }
        if self.num_trials == 0 {
            return Err(ParameterError::ZeroTrials.into());
        }
        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NonFiniteAmount { field });
    }
    if value < 0.0 {
        return Err(ParameterError::NegativeAmount { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Horizon {
    Unset,
    Months(usize),
    Years(usize),
    Retirement {
        current_age: u32,
        retirement_age: u32,
    },
}

/// Fluent builder for [`SimulationRequest`]
#[derive(Debug, Clone)]
pub struct SimulationRequestBuilder {
    allocation: Allocation,
    initial_deposit: f64,
    monthly_contribution: f64,
    horizon: Horizon,
    num_trials: usize,
    seed: Option<u64>,
}

impl SimulationRequestBuilder {
    #[must_use]
    pub fn new(allocation: Allocation) -> Self {
        Self {
            allocation,
            initial_deposit: 0.0,
            monthly_contribution: 0.0,
            horizon: Horizon::Unset,
            num_trials: DEFAULT_NUM_TRIALS,
            seed: None,
        }
    }

    #[must_use]
    pub fn initial_deposit(mut self, amount: f64) -> Self {
        self.initial_deposit = amount;
        self
    }

    #[must_use]
    pub fn monthly_contribution(mut self, amount: f64) -> Self {
        self.monthly_contribution = amount;
        self
    }

    #[must_use]
    pub fn horizon_months(mut self, months: usize) -> Self {
        self.horizon = Horizon::Months(months);
        self
    }

    #[must_use]
    pub fn horizon_years(mut self, years: usize) -> Self {
        self.horizon = Horizon::Years(years);
        self
    }

    /// Horizon from the investor's current age to retirement
    #[must_use]
    pub fn retirement(mut self, current_age: u32, retirement_age: u32) -> Self {
        self.horizon = Horizon::Retirement {
            current_age,
            retirement_age,
        };
        self
    }

    #[must_use]
    pub fn num_trials(mut self, trials: usize) -> Self {
        self.num_trials = trials;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Apply trial count and seed from configuration
    #[must_use]
    pub fn defaults(mut self, defaults: &ProjectionDefaults) -> Self {
        self.num_trials = defaults.num_trials;
        self.seed = defaults.seed;
        self
    }

    pub fn build(self) -> Result<SimulationRequest, ProjectionError> {
        let horizon_months = match self.horizon {
            Horizon::Unset => return Err(ParameterError::ZeroHorizon.into()),
            Horizon::Months(months) => months,
            Horizon::Years(years) => years
                .checked_mul(12)
                .ok_or(ParameterError::HorizonTooLong { years })?,
            Horizon::Retirement {
                current_age,
                retirement_age,
            } => {
                if retirement_age <= current_age {
                    return Err(ParameterError::RetirementNotAfterCurrentAge {
                        current_age,
                        retirement_age,
                    }
                    .into());
                }
                (retirement_age - current_age) as usize * 12
            }
        };

        let request = SimulationRequest {
            allocation: self.allocation,
            initial_deposit: self.initial_deposit,
            monthly_contribution: self.monthly_contribution,
            horizon_months,
            num_trials: self.num_trials,
            seed: self.seed,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation() -> Allocation {
        Allocation::new(0.6, 0.3, 0.1).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let request = SimulationRequest::builder(allocation())
            .horizon_years(2)
            .build()
            .unwrap();
        assert_eq!(request.horizon_months(), 24);
        assert_eq!(request.num_trials(), DEFAULT_NUM_TRIALS);
        assert_eq!(request.seed(), None);
        assert_eq!(request.initial_deposit(), 0.0);
    }

    #[test]
    fn test_retirement_horizon() {
        let request = SimulationRequest::builder(allocation())
            .initial_deposit(10_000.0)
            .monthly_contribution(500.0)
            .retirement(30, 65)
            .build()
            .unwrap();
        assert_eq!(request.horizon_months(), 420);
        assert!((request.total_deposited() - (10_000.0 + 500.0 * 420.0)).abs() < 1e-9);

        let err = SimulationRequest::builder(allocation())
            .retirement(65, 65)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidParameters(ParameterError::RetirementNotAfterCurrentAge { .. })
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [
            (
                SimulationRequest::builder(allocation()).horizon_months(0),
                ParameterError::ZeroHorizon,
            ),
            (
                SimulationRequest::builder(allocation()),
                ParameterError::ZeroHorizon,
            ),
            (
                SimulationRequest::builder(allocation()).horizon_years(usize::MAX),
                ParameterError::HorizonTooLong { years: usize::MAX },
            ),
            (
                SimulationRequest::builder(allocation())
                    .horizon_months(12)
                    .num_trials(0),
                ParameterError::ZeroTrials,
            ),
            (
                SimulationRequest::builder(allocation())
                    .horizon_months(12)
                    .initial_deposit(-1.0),
                ParameterError::NegativeAmount {
                    field: "initial_deposit",
                    value: -1.0,
                },
            ),
            (
                SimulationRequest::builder(allocation())
                    .horizon_months(12)
                    .monthly_contribution(f64::INFINITY),
                ParameterError::NonFiniteAmount {
                    field: "monthly_contribution",
                },
            ),
        ];

        for (builder, expected) in cases {
            assert_eq!(
                builder.build().unwrap_err(),
                ProjectionError::InvalidParameters(expected)
            );
        }
    }

    #[test]
    fn test_defaults_applied() {
        let defaults = ProjectionDefaults {
            num_trials: 250,
            seed: Some(9),
            ..Default::default()
        };
        let request = SimulationRequest::builder(allocation())
            .horizon_months(6)
            .defaults(&defaults)
            .build()
            .unwrap();
        assert_eq!(request.num_trials(), 250);
        assert_eq!(request.seed(), Some(9));
    }
}
