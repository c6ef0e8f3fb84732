//! Binance REST payloads.
//!
//! Numeric fields stay as the strings Binance sends; the normalizer parses
//! them into decimals so parse failures can name the field and operation.

use serde::Deserialize;
use serde_json::{Map, Value};

/// `GET /api/v3/ticker/24hr` for a single symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub last_price: String,
    pub bid_price: String,
    pub ask_price: String,
    pub volume: String,
    /// Close of the statistics window, epoch millis.
    pub close_time: i64,
    /// Last trade id, `-1` when the window had no trades.
    #[serde(default)]
    pub last_id: Option<i64>,
}

/// One `[price, quantity]` depth entry.
pub type RawLevel = (String, String);

/// `GET /api/v3/depth`.
///
/// Entries are kept as a list rather than a map: different strings may name
/// the same price (`"10.5"` and `"10.50"`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBook {
    #[serde(default)]
    pub last_update_id: Option<i64>,
    #[serde(default)]
    pub bids: Vec<RawLevel>,
    #[serde(default)]
    pub asks: Vec<RawLevel>,
}

/// One row of `GET /api/v3/klines`.
///
/// Binance sends rows as heterogeneous arrays; only the OHLCV prefix is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct Kline {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl TryFrom<Vec<Value>> for Kline {
    type Error = String;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        let text = |index: usize| -> Result<String, String> {
            match row.get(index) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                other => Err(format!("kline column {index}: unexpected {other:?}")),
            }
        };
        let open_time = row
            .first()
            .and_then(Value::as_i64)
            .ok_or_else(|| "kline column 0: expected open time".to_string())?;

        Ok(Self {
            open_time,
            open: text(1)?,
            high: text(2)?,
            low: text(3)?,
            close: text(4)?,
            volume: text(5)?,
        })
    }
}

/// `GET /api/v3/exchangeInfo`.
///
/// Symbol records stay raw so products can carry them verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    #[serde(default)]
    pub server_time: Option<i64>,
    #[serde(default)]
    pub symbols: Vec<Value>,
}

/// Typed view of one `exchangeInfo` symbol record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// Trading rule attached to a symbol. Only price-filter fields are typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFilter {
    pub filter_type: String,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub tick_size: Option<String>,
}

pub const PRICE_FILTER: &str = "PRICE_FILTER";

/// `GET /api/v3/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub balances: Vec<AssetBalance>,
}

/// Free and locked funds for one asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

/// `DELETE /api/v3/order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAck {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /api/v3/time`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: i64,
}

/// Fields that only appear on the open-order shape. Binance spells the
/// quote quantity `cummulativeQuoteQty`; the corrected spelling is accepted
/// too.
const OPEN_ORDER_FIELDS: &[&str] = &[
    "cummulativeQuoteQty",
    "cumulativeQuoteQty",
    "stopPrice",
    "icebergQty",
    "updateTime",
    "isWorking",
];

/// An order record in one of the two shapes Binance returns.
///
/// `Open` comes from order queries (`openOrders`, `allOrders`, `order`) and
/// is timestamped by `time`. `Transaction` is the acknowledgement of a new
/// order and is timestamped by `transactTime`.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderRecord {
    Open(Map<String, Value>),
    Transaction(Map<String, Value>),
}

impl OrderRecord {
    /// Decide the record shape once, by field presence.
    ///
    /// Returns `None` when `value` is not a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        if OPEN_ORDER_FIELDS.iter().any(|f| fields.contains_key(*f)) {
            Some(Self::Open(fields))
        } else {
            Some(Self::Transaction(fields))
        }
    }

    /// Name of the field holding the order timestamp for this shape.
    #[must_use]
    pub const fn time_field(&self) -> &'static str {
        match self {
            Self::Open(_) => "time",
            Self::Transaction(_) => "transactTime",
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Open(fields) | Self::Transaction(fields) => fields,
        }
    }

    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        match self {
            Self::Open(fields) | Self::Transaction(fields) => fields,
        }
    }
}
