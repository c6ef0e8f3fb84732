//! Scripted [`VendorTransport`] for tests.
//!
//! Each method pops the next scripted response for its [`TransportMethod`].
//! When nothing is scripted, list endpoints return `[]`, order placement
//! returns the empty test-endpoint ack, cancellation echoes the order id and
//! the server-time handshake succeeds. Every other method fails, so a test
//! notices calls it did not expect.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::adapter::outbound::binance::dto::{
    AccountInfo, CancelAck, ExchangeInfo, Kline, RawBook, Ticker24h,
};
use crate::adapter::outbound::binance::settings::AuthConfig;
use crate::adapter::outbound::binance::transport::{NewOrderParams, RawFailure, VendorTransport};

/// Transport method, for scripting and call assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMethod {
    Ticker,
    Depth,
    Klines,
    ExchangeInfo,
    Account,
    PlaceOrder,
    CancelOrder,
    QueryOrder,
    OpenOrders,
    AllOrders,
    ServerTime,
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportCall {
    pub method: TransportMethod,
    pub symbol: Option<String>,
    pub order_id: Option<String>,
    /// API key a signed call was made with.
    pub api_key: Option<String>,
}

impl TransportCall {
    fn new(method: TransportMethod) -> Self {
        Self {
            method,
            symbol: None,
            order_id: None,
            api_key: None,
        }
    }

    fn signed_by(mut self, auth: &AuthConfig) -> Self {
        self.api_key = Some(auth.key.clone());
        self
    }

    fn symbol(mut self, symbol: Option<&str>) -> Self {
        self.symbol = symbol.map(str::to_string);
        self
    }

    fn order_id(mut self, order_id: &str) -> Self {
        self.order_id = Some(order_id.to_string());
        self
    }
}

type Scripted = std::result::Result<Value, RawFailure>;

/// In-memory transport with scripted responses.
#[derive(Default)]
pub struct ScriptedTransport {
    credentials: Option<AuthConfig>,
    server_offset_ms: i64,
    latency: Option<Duration>,
    responses: Mutex<HashMap<TransportMethod, VecDeque<Scripted>>>,
    cancel_failures: Mutex<HashMap<String, RawFailure>>,
    calls: Mutex<Vec<TransportCall>>,
    placed: Mutex<Vec<NewOrderParams>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials the transport reports as its own.
    pub fn with_credentials(mut self, credentials: AuthConfig) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Offset returned by the server-time handshake.
    pub fn with_server_offset(mut self, offset_ms: i64) -> Self {
        self.server_offset_ms = offset_ms;
        self
    }

    /// Delay every call, so overlapping calls can be observed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful response for `method`.
    pub fn respond(&self, method: TransportMethod, value: Value) {
        self.responses
            .lock()
            .entry(method)
            .or_default()
            .push_back(Ok(value));
    }

    /// Queue a failure for `method`.
    pub fn fail_next(&self, method: TransportMethod, failure: RawFailure) {
        self.responses
            .lock()
            .entry(method)
            .or_default()
            .push_back(Err(failure));
    }

    /// Fail every cancellation of `order_id`.
    pub fn fail_cancel(&self, order_id: &str, failure: RawFailure) {
        self.cancel_failures
            .lock()
            .insert(order_id.to_string(), failure);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: TransportMethod) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Order ids passed to `cancel_order`, in call order.
    pub fn cancelled_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == TransportMethod::CancelOrder)
            .filter_map(|c| c.order_id.clone())
            .collect()
    }

    /// Parameters of every order placed.
    pub fn placed_orders(&self) -> Vec<NewOrderParams> {
        self.placed.lock().clone()
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn dispatch<T, D>(&self, call: TransportCall, default: D) -> Result<T, RawFailure>
    where
        T: DeserializeOwned,
        D: FnOnce() -> Scripted + Send,
    {
        let method = call.method;
        self.calls.lock().push(call);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = self
            .responses
            .lock()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);
        let value = scripted.unwrap_or_else(default)?;
        serde_json::from_value(value).map_err(|e| RawFailure::decode(200, e.to_string()))
    }

    fn unscripted(method: TransportMethod) -> impl FnOnce() -> Scripted + Send {
        move || Err(RawFailure::network(format!("no scripted response for {method:?}")))
    }
}

#[async_trait]
impl VendorTransport for ScriptedTransport {
    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, RawFailure> {
        let call = TransportCall::new(TransportMethod::Ticker).symbol(Some(symbol));
        self.dispatch(call, Self::unscripted(TransportMethod::Ticker))
            .await
    }

    async fn depth(&self, symbol: &str, _limit: u16) -> Result<RawBook, RawFailure> {
        let call = TransportCall::new(TransportMethod::Depth).symbol(Some(symbol));
        self.dispatch(call, Self::unscripted(TransportMethod::Depth))
            .await
    }

    async fn klines(
        &self,
        symbol: &str,
        _interval: &str,
        _limit: u16,
        _start_time: Option<i64>,
    ) -> Result<Vec<Kline>, RawFailure> {
        let call = TransportCall::new(TransportMethod::Klines).symbol(Some(symbol));
        self.dispatch(call, || Ok(json!([]))).await
    }

    async fn exchange_info(&self) -> Result<ExchangeInfo, RawFailure> {
        let call = TransportCall::new(TransportMethod::ExchangeInfo);
        self.dispatch(call, || Ok(json!({ "symbols": [] }))).await
    }

    async fn account(&self, auth: &AuthConfig) -> Result<AccountInfo, RawFailure> {
        let call = TransportCall::new(TransportMethod::Account).signed_by(auth);
        self.dispatch(call, Self::unscripted(TransportMethod::Account))
            .await
    }

    async fn place_order(
        &self,
        auth: &AuthConfig,
        params: &NewOrderParams,
    ) -> Result<Value, RawFailure> {
        self.placed.lock().push(params.clone());
        let call = TransportCall::new(TransportMethod::PlaceOrder)
            .symbol(Some(&params.symbol))
            .signed_by(auth);
        self.dispatch(call, || Ok(json!({}))).await
    }

    async fn cancel_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<CancelAck, RawFailure> {
        let call = TransportCall::new(TransportMethod::CancelOrder)
            .symbol(Some(symbol))
            .order_id(order_id)
            .signed_by(auth);
        let failure = self.cancel_failures.lock().get(order_id).cloned();
        let echo = json!({
            "symbol": symbol,
            "orderId": order_id.parse::<i64>().ok(),
            "status": "CANCELED",
        });
        self.dispatch(call, move || match failure {
            Some(failure) => Err(failure),
            None => Ok(echo),
        })
        .await
    }

    async fn query_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<Value, RawFailure> {
        let call = TransportCall::new(TransportMethod::QueryOrder)
            .symbol(Some(symbol))
            .order_id(order_id)
            .signed_by(auth);
        self.dispatch(call, Self::unscripted(TransportMethod::QueryOrder))
            .await
    }

    async fn open_orders(
        &self,
        auth: &AuthConfig,
        symbol: Option<&str>,
    ) -> Result<Vec<Value>, RawFailure> {
        let call = TransportCall::new(TransportMethod::OpenOrders)
            .symbol(symbol)
            .signed_by(auth);
        self.dispatch(call, || Ok(json!([]))).await
    }

    async fn all_orders(&self, auth: &AuthConfig, symbol: &str) -> Result<Vec<Value>, RawFailure> {
        let call = TransportCall::new(TransportMethod::AllOrders)
            .symbol(Some(symbol))
            .signed_by(auth);
        self.dispatch(call, || Ok(json!([]))).await
    }

    async fn sync_server_time(&self) -> Result<i64, RawFailure> {
        let call = TransportCall::new(TransportMethod::ServerTime);
        let offset = self.server_offset_ms;
        self.dispatch(call, move || Ok(json!(offset))).await
    }

    fn credentials(&self) -> Option<AuthConfig> {
        self.credentials.clone()
    }
}
