//! Market data snapshots: tickers and candles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Price, Volume};

/// Rolling market statistics for one product.
///
/// `price` is the last traded price. It is not the midpoint of `bid` and
/// `ask`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticker {
    pub product_id: String,
    pub price: Price,
    pub bid: Price,
    pub ask: Price,
    pub volume: Volume,
    pub time: DateTime<Utc>,
    pub trade_id: Option<i64>,
}

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    /// Open time of the bar.
    pub timestamp: DateTime<Utc>,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

/// Default number of candles requested when no limit is given.
pub const DEFAULT_CANDLE_LIMIT: u16 = 500;

/// Parameters for a candle query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleRequest {
    pub product_id: String,
    /// Venue interval code, e.g. `1m`, `5m`, `1h`.
    pub interval: String,
    #[serde(default)]
    pub limit: Option<u16>,
    /// Only return bars opening at or after this instant.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
}

impl CandleRequest {
    #[must_use]
    pub fn new(product_id: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            interval: interval.into(),
            limit: None,
            from: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Requested limit, falling back to [`DEFAULT_CANDLE_LIMIT`].
    #[must_use]
    pub fn effective_limit(&self) -> u16 {
        self.limit.unwrap_or(DEFAULT_CANDLE_LIMIT)
    }
}
