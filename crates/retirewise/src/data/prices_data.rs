use std::path::Path;

use color_eyre::eyre::WrapErr;
use jiff::civil::Date;
use retirewise_core::InMemoryPriceHistory;
use retirewise_core::model::PriceHistory;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Closing prices per ticker; `null` closes are skipped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricesData {
    pub tickers: FxHashMap<String, Vec<(Date, Option<f64>)>>,
}

impl PricesData {
    pub fn into_provider(self) -> InMemoryPriceHistory {
        self.tickers
            .into_iter()
            .map(|(ticker, closes)| {
                let history = PriceHistory::from_pairs(
                    closes
                        .into_iter()
                        .filter_map(|(date, close)| close.map(|c| (date, c))),
                );
                (ticker, history)
            })
            .collect()
    }
}

/// Read a prices file into an in-memory provider
pub fn load_prices(path: &Path) -> color_eyre::Result<InMemoryPriceHistory> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read prices {}", path.display()))?;
    let data: PricesData = serde_json::from_str(&json)
        .wrap_err_with(|| format!("failed to parse prices {}", path.display()))?;
    let provider = data.into_provider();
    tracing::debug!(tickers = provider.len(), path = %path.display(), "loaded prices");
    Ok(provider)
}
