//! Binance REST transport.
//!
//! Public endpoints are plain GETs. Signed endpoints append `recvWindow`,
//! `timestamp` and an HMAC-SHA256 `signature` of the query string, and send
//! the API key in `X-MBX-APIKEY`.
//!
//! Only GETs are retried, and only after connect failures or timeouts, and
//! only when `reconnect` is enabled. Order placement and cancellation are
//! sent once.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::Sha256;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::dto::{
    AccountInfo, CancelAck, ExchangeInfo, Kline, RawBook, ServerTimeResponse, Ticker24h,
};
use super::settings::{AuthConfig, BinanceConfig};
use super::transport::{NewOrderParams, RawFailure, VendorTransport};

type HmacSha256 = Hmac<Sha256>;

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const ORDER_PATH: &str = "/api/v3/order";
const TEST_ORDER_PATH: &str = "/api/v3/order/test";

/// Hex HMAC-SHA256 of `payload` keyed by `secret`.
///
/// # Errors
///
/// Returns a [`RawFailure`] if the key is rejected by the MAC.
pub fn sign(secret: &str, payload: &str) -> Result<String, RawFailure> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| RawFailure::network(format!("invalid signing key: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// HTTP client for the Binance spot REST API.
pub struct RestTransport {
    http: HttpClient,
    base_url: String,
    credentials: Option<AuthConfig>,
    recv_window: u64,
    test_mode: bool,
    reconnect: bool,
    verbose: bool,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
    /// Server clock minus local clock, in milliseconds.
    time_offset_ms: AtomicI64,
}

impl RestTransport {
    /// Transport against `base_url` with default options and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            recv_window: 5000,
            test_mode: false,
            reconnect: false,
            verbose: false,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
            time_offset_ms: AtomicI64::new(0),
        }
    }

    #[must_use]
    pub fn from_config(config: &BinanceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials: config.credentials().cloned(),
            recv_window: config.options.recv_window,
            test_mode: config.options.test,
            reconnect: config.options.reconnect,
            verbose: config.options.verbose,
            retry_max_attempts: config.http.retry_max_attempts,
            retry_backoff_ms: config.http.retry_backoff_ms,
            time_offset_ms: AtomicI64::new(0),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: AuthConfig) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Path new orders are posted to.
    #[must_use]
    pub const fn order_path(&self) -> &'static str {
        if self.test_mode {
            TEST_ORDER_PATH
        } else {
            ORDER_PATH
        }
    }

    /// Current clock offset applied to signed requests.
    #[must_use]
    pub fn time_offset_ms(&self) -> i64 {
        self.time_offset_ms.load(Ordering::Relaxed)
    }

    fn timestamp(&self) -> i64 {
        Utc::now().timestamp_millis() + self.time_offset_ms()
    }

    /// Full request URL. With `auth`, the query gets `recvWindow`,
    /// `timestamp` and a trailing `signature`.
    fn build_url(
        &self,
        path: &str,
        params: &[(&str, String)],
        auth: Option<&AuthConfig>,
    ) -> Result<String, RawFailure> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key, value);
        }
        if auth.is_some() {
            query.append_pair("recvWindow", &self.recv_window.to_string());
            query.append_pair("timestamp", &self.timestamp().to_string());
        }

        let mut query = query.finish();
        if let Some(auth) = auth {
            let signature = sign(&auth.secret, &query)?;
            query.push_str("&signature=");
            query.push_str(&signature);
        }

        if query.is_empty() {
            Ok(format!("{}{path}", self.base_url))
        } else {
            Ok(format!("{}{path}?{query}", self.base_url))
        }
    }

    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        auth: Option<&AuthConfig>,
    ) -> Result<T, RawFailure>
    where
        T: DeserializeOwned,
    {
        let retryable = method == Method::GET && self.reconnect;
        let max_attempts = if retryable {
            self.retry_max_attempts.max(1)
        } else {
            1
        };
        let mut attempt = 0;

        loop {
            attempt += 1;
            // Rebuilt per attempt so signed retries carry a fresh timestamp.
            let url = self.build_url(path, params, auth)?;
            if self.verbose {
                info!(%method, path, attempt, "Binance request");
            } else {
                debug!(%method, path, attempt, "Binance request");
            }

            let mut builder = self.http.request(method.clone(), &url);
            if let Some(auth) = auth {
                builder = builder.header(API_KEY_HEADER, &auth.key);
            }

            match builder.send().await {
                Ok(response) => return Self::read_response(response).await,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err.into());
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RawFailure> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(RawFailure::http(status, body));
        }
        serde_json::from_str(&body).map_err(|e| RawFailure::decode(status, e.to_string()))
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Binance request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }

    async fn public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RawFailure> {
        self.request(Method::GET, path, params, None).await
    }

    async fn signed<T: DeserializeOwned>(
        &self,
        auth: &AuthConfig,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RawFailure> {
        self.request(method, path, params, Some(auth)).await
    }
}

#[async_trait]
impl VendorTransport for RestTransport {
    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, RawFailure> {
        self.public("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }

    async fn depth(&self, symbol: &str, limit: u16) -> Result<RawBook, RawFailure> {
        self.public(
            "/api/v3/depth",
            &[("symbol", symbol.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u16,
        start_time: Option<i64>,
    ) -> Result<Vec<Kline>, RawFailure> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start_time) = start_time {
            params.push(("startTime", start_time.to_string()));
        }
        self.public("/api/v3/klines", &params).await
    }

    async fn exchange_info(&self) -> Result<ExchangeInfo, RawFailure> {
        self.public("/api/v3/exchangeInfo", &[]).await
    }

    async fn account(&self, auth: &AuthConfig) -> Result<AccountInfo, RawFailure> {
        self.signed(auth, Method::GET, "/api/v3/account", &[]).await
    }

    async fn place_order(
        &self,
        auth: &AuthConfig,
        params: &NewOrderParams,
    ) -> Result<Value, RawFailure> {
        self.signed(auth, Method::POST, self.order_path(), &params.query_pairs())
            .await
    }

    async fn cancel_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<CancelAck, RawFailure> {
        self.signed(
            auth,
            Method::DELETE,
            ORDER_PATH,
            &[
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
        )
        .await
    }

    async fn query_order(
        &self,
        auth: &AuthConfig,
        symbol: &str,
        order_id: &str,
    ) -> Result<Value, RawFailure> {
        self.signed(
            auth,
            Method::GET,
            ORDER_PATH,
            &[
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
        )
        .await
    }

    async fn open_orders(
        &self,
        auth: &AuthConfig,
        symbol: Option<&str>,
    ) -> Result<Vec<Value>, RawFailure> {
        let params: Vec<(&str, String)> = symbol
            .map(|s| vec![("symbol", s.to_string())])
            .unwrap_or_default();
        self.signed(auth, Method::GET, "/api/v3/openOrders", &params)
            .await
    }

    async fn all_orders(&self, auth: &AuthConfig, symbol: &str) -> Result<Vec<Value>, RawFailure> {
        self.signed(
            auth,
            Method::GET,
            "/api/v3/allOrders",
            &[("symbol", symbol.to_string())],
        )
        .await
    }

    async fn sync_server_time(&self) -> Result<i64, RawFailure> {
        let requested = Utc::now().timestamp_millis();
        let response: ServerTimeResponse = self.public("/api/v3/time", &[]).await?;
        let received = Utc::now().timestamp_millis();

        // Assume the server stamped the response halfway through the round trip.
        let local = requested + (received - requested) / 2;
        let offset = response.server_time - local;
        self.time_offset_ms.store(offset, Ordering::Relaxed);
        debug!(offset_ms = offset, "Stored server time offset");
        Ok(offset)
    }

    fn credentials(&self) -> Option<AuthConfig> {
        self.credentials.clone()
    }
}
