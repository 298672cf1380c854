//! Price-history providers
//!
//! Market data is an external collaborator. The engine only sees the
//! [`PriceHistoryProvider`] trait; real implementations (HTTP quote services,
//! local caches) live outside this crate.

use rustc_hash::FxHashMap;

use crate::error::ProviderError;
use crate::model::{Lookback, PriceHistory};

/// Source of closing-price history for stock tickers
pub trait PriceHistoryProvider {
    /// Fetch the closing prices for `ticker` within `lookback`.
    ///
    /// Unknown or delisted tickers may return an empty history instead of an
    /// error; the estimator treats both the same way.
    fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<PriceHistory, ProviderError>;
}

impl<P: PriceHistoryProvider + ?Sized> PriceHistoryProvider for &P {
    fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<PriceHistory, ProviderError> {
        (**self).fetch(ticker, lookback)
    }
}

/// Provider backed by preloaded histories
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceHistory {
    histories: FxHashMap<String, PriceHistory>,
}

impl InMemoryPriceHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the history for a ticker (stored upper-case)
    pub fn insert(&mut self, ticker: impl AsRef<str>, history: PriceHistory) {
        self.histories
            .insert(ticker.as_ref().trim().to_ascii_uppercase(), history);
    }

    #[must_use]
    pub fn with(mut self, ticker: impl AsRef<str>, history: PriceHistory) -> Self {
        self.insert(ticker, history);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl FromIterator<(String, PriceHistory)> for InMemoryPriceHistory {
    fn from_iter<I: IntoIterator<Item = (String, PriceHistory)>>(iter: I) -> Self {
        let mut provider = Self::new();
        for (ticker, history) in iter {
            provider.insert(ticker, history);
        }
        provider
    }
}

impl PriceHistoryProvider for InMemoryPriceHistory {
    fn fetch(&self, ticker: &str, lookback: Lookback) -> Result<PriceHistory, ProviderError> {
        Ok(self
            .histories
            .get(&ticker.trim().to_ascii_uppercase())
            .map(|h| h.within(lookback))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let provider = InMemoryPriceHistory::new().with(
            "vti",
            PriceHistory::from_pairs([(date(2020, 1, 31), 1.0), (date(2020, 2, 28), 1.1)]),
        );
        assert_eq!(provider.fetch("VTI", Lookback::Max).unwrap().len(), 2);
        assert_eq!(provider.fetch(" Vti ", Lookback::Max).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_ticker_is_empty() {
        let provider = InMemoryPriceHistory::new();
        assert!(provider.fetch("NOPE", Lookback::Max).unwrap().is_empty());
    }
}
