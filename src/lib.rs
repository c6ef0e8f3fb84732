//! Coinbridge - a Binance adapter behind a uniform trading contract.
//!
//! Binance's REST API is normalized into exchange-agnostic domain values:
//! tickers, aggregated order books, candles, products, balances and orders.
//! Callers speak canonical product ids (`BNB-BTC`) and never see vendor
//! symbols, vendor error shapes or request signing.
//!
//! # Architecture
//!
//! - **`domain`** - Exchange-agnostic value types
//! - **`port`** - The `PublicExchange` / `AuthenticatedExchange` contract
//! - **`adapter::outbound::binance`** - Binance implementation of the
//!   contract: transport, error classification, normalization, server-time
//!   policy and the concurrent cancel-all fan-out
//! - **`adapter::inbound::cli`** - Command-line front end
//! - **`infrastructure::config`** - TOML configuration and logging setup
//!
//! # Example
//!
//! ```no_run
//! use coinbridge::adapter::outbound::binance::{BinanceConfig, BinanceExchange};
//! use coinbridge::port::outbound::exchange::PublicExchange;
//!
//! # async fn run() -> coinbridge::error::Result<()> {
//! let exchange = BinanceExchange::from_config(&BinanceConfig::default())?;
//! let ticker = exchange.load_ticker("BNB-BTC").await?;
//! println!("{} last traded at {}", ticker.product_id, ticker.price);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `testkit` - Scripted transport and vendor payload builders for tests
//! - `integration-tests` - Tests that hit the live Binance API

pub mod adapter;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
