//! On-disk input formats for the command-line tool
//!
//! - `portfolio_data` - Supplier portfolio documents (`portfolio_name`, `user_data`, `portfolio`)
//! - `prices_data` - Ticker price histories as `{ "TICKER": [["YYYY-MM-DD", close], ...] }`
//! - `config_data` - Projection configuration in YAML

pub mod config_data;
pub mod portfolio_data;
pub mod prices_data;

pub use config_data::load_config;
pub use portfolio_data::{PortfolioDocument, PortfolioFile, UserData, load_portfolio};
pub use prices_data::{PricesData, load_prices};
