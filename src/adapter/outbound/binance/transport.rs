//! Raw Binance transport.
//!
//! The facade talks to Binance only through [`VendorTransport`], so the REST
//! client can be swapped for a scripted double in tests. Every method reports
//! failures as a [`RawFailure`]; the classifier turns those into crate errors.

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use super::dto::{AccountInfo, CancelAck, ExchangeInfo, Kline, RawBook, Ticker24h};
use super::settings::AuthConfig;
use crate::domain::{OrderType, PlaceOrder, Side, TimeInForce};

/// Failure reported by the transport before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    /// HTTP status, `None` when no response arrived.
    pub status: Option<u16>,
    /// Response body, if one was read.
    pub body: Option<String>,
    pub message: String,
}

impl RawFailure {
    /// No response: connection refused, timeout, TLS failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Non-success HTTP status with the response body.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: "non-success response".into(),
        }
    }

    /// Response arrived but could not be decoded.
    pub fn decode(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RawFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RawFailure {}

impl From<reqwest::Error> for RawFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            body: None,
            message: err.to_string(),
        }
    }
}

/// Parameters of `POST /api/v3/order`, already in vendor terms.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderParams {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub client_order_id: Option<String>,
}

impl NewOrderParams {
    /// Vendor parameters for a canonical order request.
    ///
    /// Limit orders default to GTC. Market orders carry neither price nor
    /// time in force.
    #[must_use]
    pub fn from_request(symbol: String, order: &PlaceOrder) -> Self {
        let (price, time_in_force) = match order.order_type {
            OrderType::Limit => (
                order.price,
                Some(order.time_in_force.unwrap_or_default()),
            ),
            OrderType::Market => (None, None),
        };
        Self {
            symbol,
            side: order.side,
            order_type: order.order_type,
            quantity: order.size,
            price,
            time_in_force,
            client_order_id: order.client_order_id.clone(),
        }
    }

    /// Query parameters in the order Binance documents them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_upper().to_string()),
            ("type", self.order_type.as_upper().to_string()),
            ("quantity", self.quantity.normalize().to_string()),
        ];
        if let Some(price) = self.price {
            pairs.push(("price", price.normalize().to_string()));
        }
        if let Some(tif) = self.time_in_force {
            pairs.push(("timeInForce", tif.as_upper().to_string()));
        }
        if let Some(id) = &self.client_order_id {
            pairs.push(("newClientOrderId", id.clone()));
        }
        pairs
    }
}

/// Calls the Binance API exposes to the adapter.
///
/// Signed calls take the credentials to sign with; the facade resolves them
/// before the call is made. Order records come back as raw JSON because
/// Binance returns two shapes for them; the normalizer decides which one it
/// got.
#[async_trait]
pub trait VendorTransport: Send + Sync {
    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, RawFailure>;

    async fn depth(&self, symbol: &str, limit: u16) -> Result<RawBook, RawFailure>;

    /// `start_time` is epoch millis.
    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u16,
        start_time: Option<i64>,
    ) -> Result<Vec<Kline>, RawFailure>;

    async fn exchange_info(&self) -> Result<ExchangeInfo, RawFailure>;

    async fn account(&self, auth: &AuthConfig) -> Result<AccountInfo, RawFailure>;

    async fn place_order(
        &self,
        auth: &AuthConfig,
        params: &NewOrderParams,
    ) -> Result<Value, RawFailure>;

    async fn cancel_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<CancelAck, RawFailure>;

    async fn query_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<Value, RawFailure>;

    /// Open orders for one symbol, or for every symbol when `None`.
    async fn open_orders(
        &self,
        auth: &AuthConfig,
        symbol: Option<&str>,
    ) -> Result<Vec<Value>, RawFailure>;

    /// Full order history for one symbol.
    async fn all_orders(&self, auth: &AuthConfig, symbol: &str) -> Result<Vec<Value>, RawFailure>;

    /// Fetch the server clock and store the offset used to timestamp signed
    /// requests. Returns the offset in milliseconds.
    async fn sync_server_time(&self) -> Result<i64, RawFailure>;

    /// Credentials held by the transport itself, if any. Used when the
    /// facade has none of its own.
    fn credentials(&self) -> Option<AuthConfig>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn limit_orders_default_to_gtc() {
        let order = PlaceOrder::limit("BNB-BTC", Side::Buy, dec!(5), dec!(0.0025));
        let params = NewOrderParams::from_request("BNBBTC".into(), &order);
        assert_eq!(
            params.query_pairs(),
            vec![
                ("symbol", "BNBBTC".to_string()),
                ("side", "BUY".to_string()),
                ("type", "LIMIT".to_string()),
                ("quantity", "5".to_string()),
                ("price", "0.0025".to_string()),
                ("timeInForce", "GTC".to_string()),
            ]
        );
    }

    #[test]
    fn market_orders_drop_price_and_time_in_force() {
        let mut order = PlaceOrder::market("ETH-BTC", Side::Sell, dec!(1.50));
        order.price = Some(dec!(1));
        order.time_in_force = Some(TimeInForce::Ioc);
        let params = NewOrderParams::from_request("ETHBTC".into(), &order);
        assert!(params.price.is_none());
        assert!(params.time_in_force.is_none());
        assert_eq!(params.query_pairs()[3], ("quantity", "1.5".to_string()));
    }

    #[test]
    fn client_order_id_is_forwarded() {
        let order = PlaceOrder::limit("LTC-BTC", Side::Buy, dec!(1), dec!(0.01))
            .with_client_order_id("abc");
        let pairs = NewOrderParams::from_request("LTCBTC".into(), &order).query_pairs();
        assert!(pairs.contains(&("newClientOrderId", "abc".to_string())));
    }

    #[test]
    fn raw_failure_display_includes_status() {
        assert_eq!(
            RawFailure::http(418, "{}").to_string(),
            "non-success response (status 418)"
        );
        assert_eq!(RawFailure::network("timed out").to_string(), "timed out");
    }
}
