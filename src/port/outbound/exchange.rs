//! Exchange port for market data and order management.
//!
//! These traits are the uniform trading contract shared by every exchange
//! adapter. Product ids are always canonical (`BASE-QUOTE`); translating them
//! to vendor symbols is the adapter's job.

use async_trait::async_trait;

use crate::domain::{
    AggregatedBook, Balances, Candle, CandleRequest, LiveOrder, PlaceOrder, Price, Product,
    Ticker,
};
use crate::error::Error;

/// Public market data. Never requires credentials.
#[async_trait]
pub trait PublicExchange: Send + Sync {
    /// Latest ticker for a product.
    async fn load_ticker(&self, product_id: &str) -> Result<Ticker, Error>;

    /// Snapshot of the aggregated order book.
    async fn load_orderbook(&self, product_id: &str) -> Result<AggregatedBook, Error>;

    /// Historical candles.
    async fn load_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, Error>;

    /// Every product listed on the exchange.
    async fn load_products(&self) -> Result<Vec<Product>, Error>;

    /// Midpoint between the current best bid and best ask.
    async fn load_mid_market_price(&self, product_id: &str) -> Result<Price, Error>;

    /// Exchange name for logging/debugging.
    fn owner(&self) -> &'static str;
}

/// Account and order operations. Every method requires credentials.
#[async_trait]
pub trait AuthenticatedExchange: PublicExchange {
    /// Balances keyed by account scope, then currency.
    async fn load_balances(&self) -> Result<Balances, Error>;

    /// Submit a new order.
    async fn place_order(&self, order: &PlaceOrder) -> Result<LiveOrder, Error>;

    /// Cancel one order and return the cancelled order id.
    async fn cancel_order(&self, id: &str, product_id: &str) -> Result<String, Error>;

    /// Cancel every open order, optionally restricted to one product.
    ///
    /// Returns cancelled ids in the order the open orders were listed.
    ///
    /// # Errors
    ///
    /// Fails with a business condition when there is nothing to cancel, and
    /// with a partial-cancellation error when any single cancellation fails.
    async fn cancel_all_orders(&self, product_id: Option<&str>) -> Result<Vec<String>, Error>;

    /// Current state of one order.
    async fn load_order(&self, id: &str, product_id: &str) -> Result<LiveOrder, Error>;

    /// With a product: that product's order history. Without: all open orders.
    async fn load_all_orders(&self, product_id: Option<&str>) -> Result<Vec<LiveOrder>, Error>;
}
