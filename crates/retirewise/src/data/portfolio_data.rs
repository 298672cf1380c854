use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use retirewise_core::model::Holding;
use serde::{Deserialize, Serialize};

/// Investor profile saved alongside a generated portfolio
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(rename = "Initial_investment", alias = "initial_investment", default)]
    pub initial_investment: Option<f64>,
    #[serde(default)]
    pub monthly_contribution: Option<f64>,
    #[serde(default)]
    pub retirement_age: Option<u32>,
    #[serde(default)]
    pub ethical_values: Vec<String>,
    #[serde(default)]
    pub risk_aversion: Option<String>,
}

/// A named portfolio as produced by the portfolio supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioDocument {
    #[serde(default)]
    pub portfolio_name: Option<String>,
    #[serde(default)]
    pub user_data: UserData,
    pub portfolio: Vec<Holding>,
}

/// Accepted layouts of a portfolio file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortfolioFile {
    Single(PortfolioDocument),
    Many(Vec<PortfolioDocument>),
    Holdings(Vec<Holding>),
}

impl PortfolioFile {
    /// Pick one portfolio, by name when the file holds several
    pub fn select(self, name: Option<&str>) -> color_eyre::Result<PortfolioDocument> {
        match self {
            PortfolioFile::Single(doc) => match name {
                Some(name) if doc.portfolio_name.as_deref() != Some(name) => {
                    Err(eyre!("portfolio {name:?} not found"))
                }
                _ => Ok(doc),
            },
            PortfolioFile::Holdings(portfolio) => match name {
                Some(name) => Err(eyre!("portfolio {name:?} not found (file has no names)")),
                None => Ok(PortfolioDocument {
                    portfolio_name: None,
                    user_data: UserData::default(),
                    portfolio,
                }),
            },
            PortfolioFile::Many(docs) => match name {
                Some(name) => docs
                    .into_iter()
                    .find(|d| d.portfolio_name.as_deref() == Some(name))
                    .ok_or_else(|| eyre!("portfolio {name:?} not found")),
                None => {
                    let count = docs.len();
                    let mut docs = docs.into_iter();
                    match (docs.next(), count) {
                        (Some(doc), 1) => Ok(doc),
                        (None, _) => Err(eyre!("portfolio file is empty")),
                        _ => Err(eyre!(
                            "portfolio file holds {count} portfolios; choose one with --name"
                        )),
                    }
                }
            },
        }
    }
}

/// Read and select a portfolio from a JSON file
pub fn load_portfolio(path: &Path, name: Option<&str>) -> color_eyre::Result<PortfolioDocument> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read portfolio {}", path.display()))?;
    let file: PortfolioFile = serde_json::from_str(&json)
        .wrap_err_with(|| format!("failed to parse portfolio {}", path.display()))?;
    let doc = file.select(name)?;
    tracing::debug!(
        name = doc.portfolio_name.as_deref().unwrap_or("<unnamed>"),
        holdings = doc.portfolio.len(),
        "loaded portfolio"
    );
    Ok(doc)
}
