//! Binance implementation of the exchange port.
//!
//! [`BinanceExchange`] translates canonical product ids, gates signed calls
//! on credentials, runs the server-time handshake before each signed call,
//! classifies vendor failures and normalizes every response.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::auth::ensure_authenticated;
use super::book::build_book;
use super::classify::Classified;
use super::normalize::{
    mid_market_price, normalize_balances, normalize_candles, normalize_order_value,
    normalize_placed_order, normalize_product, normalize_ticker,
};
use super::orchestrate::join_all_or_first_error;
use super::rest::RestTransport;
use super::server_time::{ServerTime, ServerTimeMode};
use super::settings::{AuthConfig, BinanceConfig, BinanceOptions};
use super::symbol::to_vendor_symbol;
use super::transport::{NewOrderParams, RawFailure, VendorTransport};
use crate::domain::{
    AggregatedBook, Balances, Candle, CandleRequest, LiveOrder, PlaceOrder, Price, Product,
    Side, Ticker,
};
use crate::error::{BusinessCondition, Error, Result};
use crate::port::outbound::exchange::{AuthenticatedExchange, PublicExchange};

/// Depth requested for order book snapshots.
pub const DEPTH_LIMIT: u16 = 100;

const OWNER: &str = "Binance";

/// An open order scheduled for cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CancelTarget {
    symbol: String,
    order_id: String,
}

impl CancelTarget {
    fn from_open_order(
        operation: &'static str,
        requested_symbol: Option<&str>,
        order: &Value,
    ) -> Result<Self> {
        let symbol = order
            .get("symbol")
            .and_then(Value::as_str)
            .or(requested_symbol)
            .ok_or_else(|| Error::parse(operation, "symbol", &order.to_string()))?;
        let order_id = match order.get("orderId") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => return Err(Error::parse(operation, "orderId", &order.to_string())),
        };
        Ok(Self {
            symbol: symbol.to_string(),
            order_id,
        })
    }
}

/// Binance spot exchange adapter.
pub struct BinanceExchange<V: VendorTransport = RestTransport> {
    transport: Arc<V>,
    auth: Option<AuthConfig>,
    server_time: ServerTime,
}

impl BinanceExchange<RestTransport> {
    /// Build an adapter backed by the REST transport.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn from_config(config: &BinanceConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(RestTransport::from_config(config));
        info!(
            api_url = %config.api_url,
            test = config.options.test,
            authenticated = config.credentials().is_some(),
            "Binance adapter configured"
        );
        Ok(Self::new(
            transport,
            config.credentials().cloned(),
            &config.options,
        ))
    }
}

impl<V: VendorTransport> BinanceExchange<V> {
    #[must_use]
    pub fn new(transport: Arc<V>, auth: Option<AuthConfig>, options: &BinanceOptions) -> Self {
        Self {
            transport,
            auth,
            server_time: ServerTime::new(ServerTimeMode::from_options(options)),
        }
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<V> {
        &self.transport
    }

    #[must_use]
    pub const fn server_time_mode(&self) -> ServerTimeMode {
        self.server_time.mode()
    }

    /// Credentials every signed call of `operation` is signed with.
    fn ensure_authenticated(&self, operation: &'static str) -> Result<AuthConfig> {
        ensure_authenticated(self.auth.as_ref(), self.transport.as_ref(), operation)
    }

    /// Run one signed vendor call behind the server-time handshake.
    async fn signed<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, RawFailure>> + Send,
        T: Send,
    {
        self.server_time
            .run(self.transport.as_ref(), operation, move || async move {
                call().await.classified(operation)
            })
            .await
    }

    async fn cancel_one(
        &self,
        operation: &'static str,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<String> {
        let ack = self
            .signed(operation, || self.transport.cancel_order(auth, symbol, order_id))
            .await?;
        let cancelled = ack
            .order_id
            .map_or_else(|| order_id.to_string(), |id| id.to_string());
        info!(symbol, order_id = %cancelled, status = ?ack.status, "Order cancelled");
        Ok(cancelled)
    }

    fn normalize_orders(operation: &'static str, orders: Vec<Value>) -> Result<Vec<LiveOrder>> {
        orders
            .into_iter()
            .map(|order| normalize_order_value(operation, order))
            .collect()
    }
}

#[async_trait]
impl<V: VendorTransport> PublicExchange for BinanceExchange<V> {
    async fn load_ticker(&self, product_id: &str) -> Result<Ticker> {
        const OP: &str = "load_ticker";
        let symbol = to_vendor_symbol(product_id);
        let raw = self.transport.ticker_24h(&symbol).await.classified(OP)?;
        normalize_ticker(OP, product_id, &raw)
    }

    async fn load_orderbook(&self, product_id: &str) -> Result<AggregatedBook> {
        const OP: &str = "load_orderbook";
        let symbol = to_vendor_symbol(product_id);
        let raw = self
            .transport
            .depth(&symbol, DEPTH_LIMIT)
            .await
            .classified(OP)?;
        let book = build_book(OP, product_id, &raw)?;
        debug!(
            product_id,
            bids = book.depth(Side::Buy),
            asks = book.depth(Side::Sell),
            "Order book loaded"
        );
        Ok(book)
    }

    async fn load_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>> {
        const OP: &str = "load_candles";
        let symbol = to_vendor_symbol(&request.product_id);
        let rows = self
            .transport
            .klines(
                &symbol,
                &request.interval,
                request.effective_limit(),
                request.from.map(|from| from.timestamp_millis()),
            )
            .await
            .classified(OP)?;
        normalize_candles(OP, &rows)
    }

    async fn load_products(&self) -> Result<Vec<Product>> {
        const OP: &str = "load_products";
        let info = self.transport.exchange_info().await.classified(OP)?;
        let products = info
            .symbols
            .iter()
            .map(|raw| normalize_product(OP, raw))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = products.len(), "Products loaded");
        Ok(products)
    }

    async fn load_mid_market_price(&self, product_id: &str) -> Result<Price> {
        const OP: &str = "load_mid_market_price";
        let symbol = to_vendor_symbol(product_id);
        let raw = self.transport.ticker_24h(&symbol).await.classified(OP)?;
        mid_market_price(OP, &raw)
    }

    fn owner(&self) -> &'static str {
        OWNER
    }
}

#[async_trait]
impl<V: VendorTransport> AuthenticatedExchange for BinanceExchange<V> {
    async fn load_balances(&self) -> Result<Balances> {
        const OP: &str = "load_balances";
        let auth = self.ensure_authenticated(OP)?;
        let account = self.signed(OP, || self.transport.account(&auth)).await?;
        normalize_balances(OP, &account)
    }

    async fn place_order(&self, order: &PlaceOrder) -> Result<LiveOrder> {
        const OP: &str = "place_order";
        let auth = self.ensure_authenticated(OP)?;
        let params = NewOrderParams::from_request(to_vendor_symbol(&order.product_id), order);
        let ack = self
            .signed(OP, || self.transport.place_order(&auth, &params))
            .await?;
        let placed = normalize_placed_order(OP, ack, &params, Utc::now())?;
        info!(
            product_id = %placed.product_id,
            side = %placed.side,
            size = %placed.size,
            price = %placed.price,
            order_id = ?placed.id,
            "Order placed"
        );
        Ok(placed)
    }

    async fn cancel_order(&self, id: &str, product_id: &str) -> Result<String> {
        const OP: &str = "cancel_order";
        let auth = self.ensure_authenticated(OP)?;
        let symbol = to_vendor_symbol(product_id);
        self.cancel_one(OP, &auth, &symbol, id).await
    }

    async fn cancel_all_orders(&self, product_id: Option<&str>) -> Result<Vec<String>> {
        const OP: &str = "cancel_all_orders";
        let auth = self.ensure_authenticated(OP)?;
        let symbol = product_id.map(to_vendor_symbol);

        let open = self
            .signed(OP, || self.transport.open_orders(&auth, symbol.as_deref()))
            .await?;
        let targets = open
            .iter()
            .map(|order| CancelTarget::from_open_order(OP, symbol.as_deref(), order))
            .collect::<Result<Vec<_>>>()?;

        if targets.is_empty() {
            return Err(Error::Business {
                operation: OP,
                condition: BusinessCondition::NoOpenOrders {
                    product: product_id.unwrap_or("any product").to_string(),
                },
            });
        }

        debug!(count = targets.len(), "Cancelling open orders");
        let cancels: Vec<_> = targets
            .iter()
            .map(|target| self.cancel_one(OP, &auth, &target.symbol, &target.order_id))
            .collect();

        match join_all_or_first_error(cancels).await {
            Ok(ids) => {
                info!(count = ids.len(), "All open orders cancelled");
                Ok(ids)
            }
            Err(failure) => {
                warn!(
                    cancelled = failure.completed.len(),
                    failed = failure.failed,
                    error = %failure.first,
                    "Cancellation partially failed"
                );
                Err(Error::PartialCancellation {
                    operation: OP,
                    cancelled: failure.completed,
                    failed: failure.failed,
                    source: Box::new(failure.first),
                })
            }
        }
    }

    async fn load_order(&self, id: &str, product_id: &str) -> Result<LiveOrder> {
        const OP: &str = "load_order";
        let auth = self.ensure_authenticated(OP)?;
        let symbol = to_vendor_symbol(product_id);
        let raw = self
            .signed(OP, || self.transport.query_order(&auth, &symbol, id))
            .await?;
        normalize_order_value(OP, raw)
    }

    async fn load_all_orders(&self, product_id: Option<&str>) -> Result<Vec<LiveOrder>> {
        const OP: &str = "load_all_orders";
        let auth = self.ensure_authenticated(OP)?;
        let orders = match product_id {
            Some(product_id) => {
                let symbol = to_vendor_symbol(product_id);
                self.signed(OP, || self.transport.all_orders(&auth, &symbol))
                    .await?
            }
            None => self.signed(OP, || self.transport.open_orders(&auth, None)).await?,
        };
        Self::normalize_orders(OP, orders)
    }
}
