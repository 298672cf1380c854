//! Portfolio allocation
//!
//! Supplier holdings arrive as loosely typed records (percentages as strings,
//! free-form categories). They are parsed exactly once into an `Allocation`,
//! which is the only allocation type the estimator and simulator accept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;

/// Tolerance used when checking that class weights sum to 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Broad asset class used by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    Stock,
    Bond,
    Cash,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [AssetClass::Stock, AssetClass::Bond, AssetClass::Cash];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Stock => "Stock",
            AssetClass::Bond => "Bond",
            AssetClass::Cash => "Cash",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for AssetClass {
    type Err = ();

    /// Accepts "Stock", "stocks", "BOND", "Bonds", "cash" and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "stock" | "equitie" | "equity" => Ok(AssetClass::Stock),
            "bond" => Ok(AssetClass::Bond),
            "cash" => Ok(AssetClass::Cash),
            _ => Err(()),
        }
    }
}

/// An allocation as the supplier wrote it: either `"40%"` or a bare number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllocationValue {
    Number(f64),
    Text(String),
}

impl AllocationValue {
    /// The value when written without a `%` suffix, if it parses
    fn bare_number(&self) -> Option<f64> {
        match self {
            AllocationValue::Number(n) => Some(*n),
            AllocationValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.ends_with('%') {
                    None
                } else {
                    trimmed.parse().ok()
                }
            }
        }
    }

    /// Convert to a portfolio fraction.
    ///
    /// A trailing `%` always means percent. Bare numbers follow `scale`, which
    /// is decided once for the whole portfolio.
    pub fn to_fraction(&self, asset: &str, scale: NumberScale) -> Result<f64, AllocationError> {
        let fraction = match self {
            AllocationValue::Number(n) => scale.apply(*n),
            AllocationValue::Text(text) => {
                let trimmed = text.trim();
                let unparseable = || AllocationError::UnparseableWeight {
                    asset: asset.to_string(),
                    value: text.clone(),
                };
                if let Some(pct) = trimmed.strip_suffix('%') {
                    pct.trim().parse::<f64>().map_err(|_| unparseable())? / 100.0
                } else {
                    scale.apply(trimmed.parse::<f64>().map_err(|_| unparseable())?)
                }
            }
        };

        if !fraction.is_finite() || fraction < 0.0 {
            return Err(AllocationError::InvalidWeight {
                asset: asset.to_string(),
                weight: fraction,
            });
        }
        Ok(fraction)
    }
}

/// How bare numbers in one portfolio are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberScale {
    Percent,
    Fraction,
}

impl NumberScale {
    /// Percent when any bare number in the portfolio is above 1, fraction otherwise
    pub fn detect<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a AllocationValue>,
    {
        let any_above_one = values
            .into_iter()
            .filter_map(AllocationValue::bare_number)
            .any(|n| n > 1.0);
        if any_above_one {
            NumberScale::Percent
        } else {
            NumberScale::Fraction
        }
    }

    fn apply(self, n: f64) -> f64 {
        match self {
            NumberScale::Percent => n / 100.0,
            NumberScale::Fraction => n,
        }
    }
}

/// One line item of a supplied portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub asset_name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub allocation: AllocationValue,
    pub category: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl Holding {
    pub fn new(
        asset_name: impl Into<String>,
        ticker: Option<&str>,
        allocation: AllocationValue,
        category: impl Into<String>,
    ) -> Self {
        Self {
            asset_name: asset_name.into(),
            ticker: ticker.map(str::to_string),
            allocation,
            category: category.into(),
            rationale: None,
        }
    }

    /// Ticker with whitespace removed and upper-cased; empty strings count as absent
    #[must_use]
    pub fn normalized_ticker(&self) -> Option<String> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_uppercase)
    }
}

/// A stock ticker and its share of the whole portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerWeight {
    pub ticker: String,
    pub weight: f64,
}

/// A parsed holding with its class and portfolio fraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingWeight {
    pub asset_name: String,
    pub class: AssetClass,
    pub ticker: Option<String>,
    pub weight: f64,
}

/// Dollar split of the initial deposit and monthly contribution for one holding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingAmount {
    pub asset_name: String,
    pub class: AssetClass,
    pub ticker: Option<String>,
    pub weight: f64,
    pub initial: f64,
    pub monthly: f64,
}

/// Validated allocation across Stock/Bond/Cash with per-ticker stock weights.
///
/// Invariants: every weight is finite and non-negative, the three class
/// weights sum to 1.0 within [`WEIGHT_TOLERANCE`], and ticker weights sum to
/// the stock weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    stock: f64,
    bond: f64,
    cash: f64,
    stock_tickers: Vec<TickerWeight>,
    holdings: Vec<HoldingWeight>,
}

impl Allocation {
    /// Class-level allocation without ticker detail.
    ///
    /// Useful when the caller already has stock statistics and does not need
    /// the estimator.
    pub fn new(stock: f64, bond: f64, cash: f64) -> Result<Self, AllocationError> {
        let holdings = [
            (AssetClass::Stock, stock),
            (AssetClass::Bond, bond),
            (AssetClass::Cash, cash),
        ]
        .into_iter()
        .filter(|(_, w)| *w != 0.0)
        .map(|(class, weight)| HoldingWeight {
            asset_name: class.label().to_string(),
            class,
            ticker: None,
            weight,
        })
        .collect();

        Self::validated(stock, bond, cash, Vec::new(), holdings)
    }

    /// Allocation whose stock weight is the sum of the given ticker weights
    pub fn with_tickers<I, S>(tickers: I, bond: f64, cash: f64) -> Result<Self, AllocationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut holdings = Vec::new();
        for (ticker, weight) in tickers {
            let ticker = ticker.into().trim().to_ascii_uppercase();
            holdings.push(HoldingWeight {
                asset_name: ticker.clone(),
                class: AssetClass::Stock,
                ticker: Some(ticker),
                weight,
            });
        }
        for (class, weight) in [(AssetClass::Bond, bond), (AssetClass::Cash, cash)] {
            if weight != 0.0 {
                holdings.push(HoldingWeight {
                    asset_name: class.label().to_string(),
                    class,
                    ticker: None,
                    weight,
                });
            }
        }
        Self::from_weights(holdings)
    }

    /// Parse supplier holdings into a validated allocation
    pub fn from_holdings(holdings: &[Holding]) -> Result<Self, AllocationError> {
        if holdings.is_empty() {
            return Err(AllocationError::EmptyPortfolio);
        }

        let scale = NumberScale::detect(holdings.iter().map(|h| &h.allocation));
        let mut parsed = Vec::with_capacity(holdings.len());
        for holding in holdings {
            let Ok(class) = holding.category.parse::<AssetClass>() else {
                return Err(AllocationError::UnknownCategory {
                    asset: holding.asset_name.clone(),
                    category: holding.category.clone(),
                });
            };
            let weight = holding.allocation.to_fraction(&holding.asset_name, scale)?;
            let ticker = holding.normalized_ticker();
            if class == AssetClass::Stock && ticker.is_none() {
                return Err(AllocationError::MissingTicker {
                    asset: holding.asset_name.clone(),
                });
            }
            parsed.push(HoldingWeight {
                asset_name: holding.asset_name.clone(),
                class,
                // Bonds and cash are simulated from assumptions, so their tickers are ignored
                ticker: ticker.filter(|_| class == AssetClass::Stock),
                weight,
            });
        }

        Self::from_weights(parsed)
    }

    fn from_weights(holdings: Vec<HoldingWeight>) -> Result<Self, AllocationError> {
        let mut stock = 0.0;
        let mut bond = 0.0;
        let mut cash = 0.0;
        let mut stock_tickers: Vec<TickerWeight> = Vec::new();

        for holding in &holdings {
            if !holding.weight.is_finite() || holding.weight < 0.0 {
                return Err(AllocationError::InvalidWeight {
                    asset: holding.asset_name.clone(),
                    weight: holding.weight,
                });
            }
            match holding.class {
                AssetClass::Stock => {
                    stock += holding.weight;
                    let Some(ticker) = holding.ticker.clone() else {
                        return Err(AllocationError::MissingTicker {
                            asset: holding.asset_name.clone(),
                        });
                    };
                    match stock_tickers.iter_mut().find(|t| t.ticker == ticker) {
                        Some(existing) => existing.weight += holding.weight,
                        None => stock_tickers.push(TickerWeight {
                            ticker,
                            weight: holding.weight,
                        }),
                    }
                }
                AssetClass::Bond => bond += holding.weight,
                AssetClass::Cash => cash += holding.weight,
            }
        }

        Self::validated(stock, bond, cash, stock_tickers, holdings)
    }

    fn validated(
        stock: f64,
        bond: f64,
        cash: f64,
        stock_tickers: Vec<TickerWeight>,
        holdings: Vec<HoldingWeight>,
    ) -> Result<Self, AllocationError> {
        for (class, weight) in [
            (AssetClass::Stock, stock),
            (AssetClass::Bond, bond),
            (AssetClass::Cash, cash),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AllocationError::InvalidWeight {
                    asset: class.label().to_string(),
                    weight,
                });
            }
        }

        let total = stock + bond + cash;
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AllocationError::WeightsDoNotSum { total });
        }

        Ok(Self {
            stock,
            bond,
            cash,
            stock_tickers,
            holdings,
        })
    }

    #[must_use]
    pub fn stock_weight(&self) -> f64 {
        self.stock
    }

    #[must_use]
    pub fn bond_weight(&self) -> f64 {
        self.bond
    }

    #[must_use]
    pub fn cash_weight(&self) -> f64 {
        self.cash
    }

    #[must_use]
    pub fn weight(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stock => self.stock,
            AssetClass::Bond => self.bond,
            AssetClass::Cash => self.cash,
        }
    }

    /// Sum of the class weights (1.0 within tolerance by construction)
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.stock + self.bond + self.cash
    }

    /// Stock tickers with their share of the whole portfolio
    #[must_use]
    pub fn stock_tickers(&self) -> &[TickerWeight] {
        &self.stock_tickers
    }

    /// Stock tickers with weights renormalized to sum to 1 within the stock class.
    ///
    /// Empty when the stock class has zero weight.
    #[must_use]
    pub fn stock_sub_weights(&self) -> Vec<TickerWeight> {
        if self.stock <= 0.0 {
            return Vec::new();
        }
        self.stock_tickers
            .iter()
            .filter(|t| t.weight > 0.0)
            .map(|t| TickerWeight {
                ticker: t.ticker.clone(),
                weight: t.weight / self.stock,
            })
            .collect()
    }

    #[must_use]
    pub fn holdings(&self) -> &[HoldingWeight] {
        &self.holdings
    }

    /// Class weights in Stock, Bond, Cash order
    #[must_use]
    pub fn category_weights(&self) -> [(AssetClass, f64); 3] {
        AssetClass::ALL.map(|class| (class, self.weight(class)))
    }

    /// Split the initial deposit and monthly contribution across holdings
    #[must_use]
    pub fn holding_amounts(
        &self,
        initial_deposit: f64,
        monthly_contribution: f64,
    ) -> Vec<HoldingAmount> {
        self.holdings
            .iter()
            .map(|h| HoldingAmount {
                asset_name: h.asset_name.clone(),
                class: h.class,
                ticker: h.ticker.clone(),
                weight: h.weight,
                initial: initial_deposit * h.weight,
                monthly: monthly_contribution * h.weight,
            })
            .collect()
    }
}
