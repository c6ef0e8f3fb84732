//! Mapping from Binance payloads to canonical domain values.
//!
//! Every function here is pure. Numeric strings are parsed into decimals
//! exactly; a string that does not parse fails with [`Error::Parse`] naming
//! the operation and field rather than defaulting to zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::dto::{AccountInfo, Kline, OrderRecord, SymbolInfo, Ticker24h, PRICE_FILTER};
use super::symbol::from_vendor_symbol;
use super::transport::NewOrderParams;
use crate::domain::{
    Balance, Balances, Candle, CurrencyBalances, LiveOrder, Price, Product, Side, Ticker,
};
use crate::error::{Error, Result};

/// Account scope under which Binance balances are reported.
pub const ACCOUNT_SCOPE: &str = "USER";

const MISSING: &str = "<missing>";

/// Parse a vendor decimal string.
///
/// # Errors
///
/// Returns [`Error::Parse`] when `raw` is not a decimal number.
pub fn parse_decimal(operation: &'static str, field: &'static str, raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|_| Error::parse(operation, field, raw))
}

fn parse_millis(operation: &'static str, field: &'static str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| Error::parse(operation, field, &millis.to_string()))
}

/// Canonical side for a vendor side string.
///
/// `"BUY"` is a buy; every other value is a sell.
#[must_use]
pub fn canonical_side(raw: &str) -> Side {
    if raw == "BUY" {
        Side::Buy
    } else {
        Side::Sell
    }
}

fn take_text(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn take_required(
    operation: &'static str,
    fields: &mut Map<String, Value>,
    key: &'static str,
) -> Result<String> {
    take_text(fields, key).ok_or_else(|| Error::parse(operation, key, MISSING))
}

fn take_decimal(
    operation: &'static str,
    fields: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Decimal> {
    let raw = take_required(operation, fields, key)?;
    parse_decimal(operation, key, &raw)
}

/// Normalize an order record of either shape.
///
/// `symbol`, `orderId`, `price`, `origQty`, `side`, `status` and the
/// shape's timestamp field become canonical fields. Everything else moves
/// into `extra` untouched.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a canonical field is missing or unparsable.
/// A missing `orderId` is tolerated.
pub fn normalize_order(operation: &'static str, record: OrderRecord) -> Result<LiveOrder> {
    let time_field = record.time_field();
    let mut fields = record.into_fields();

    let symbol = take_required(operation, &mut fields, "symbol")?;
    let id = take_text(&mut fields, "orderId");
    let price = take_decimal(operation, &mut fields, "price")?;
    let size = take_decimal(operation, &mut fields, "origQty")?;
    let side = canonical_side(&take_required(operation, &mut fields, "side")?);
    let status = take_required(operation, &mut fields, "status")?;

    let millis = match fields.remove(time_field) {
        Some(value) => value
            .as_i64()
            .ok_or_else(|| Error::parse(operation, time_field, &value.to_string()))?,
        None => return Err(Error::parse(operation, time_field, MISSING)),
    };
    let time = parse_millis(operation, time_field, millis)?;

    Ok(LiveOrder {
        product_id: from_vendor_symbol(&symbol),
        id,
        price,
        side,
        size,
        status,
        time,
        extra: fields.into_iter().collect(),
    })
}

/// Normalize a raw order value, deciding its shape first.
///
/// # Errors
///
/// Returns [`Error::Parse`] when `value` is not an object or fails
/// [`normalize_order`].
pub fn normalize_order_value(operation: &'static str, value: Value) -> Result<LiveOrder> {
    if !value.is_object() {
        return Err(Error::parse(operation, "order", &value.to_string()));
    }
    let record =
        OrderRecord::from_value(value).ok_or_else(|| Error::parse(operation, "order", MISSING))?;
    normalize_order(operation, record)
}

/// Normalize the acknowledgement of a new order.
///
/// The test endpoint acknowledges with an empty object, and small response
/// types omit fields. Anything missing is taken from the request: symbol,
/// side, price, quantity, status `NEW` and the current time.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the acknowledgement is not an object or a
/// vendor-supplied field does not parse.
pub fn normalize_placed_order(
    operation: &'static str,
    ack: Value,
    params: &NewOrderParams,
    now: DateTime<Utc>,
) -> Result<LiveOrder> {
    let Value::Object(mut fields) = ack else {
        return Err(Error::parse(operation, "order", &ack.to_string()));
    };

    let defaults = [
        ("symbol", Value::String(params.symbol.clone())),
        ("side", Value::String(params.side.as_upper().to_string())),
        (
            "price",
            Value::String(params.price.unwrap_or(Decimal::ZERO).normalize().to_string()),
        ),
        ("origQty", Value::String(params.quantity.normalize().to_string())),
        ("status", Value::String("NEW".to_string())),
    ];
    for (key, value) in defaults {
        fields.entry(key).or_insert(value);
    }

    let record = OrderRecord::from_value(Value::Object(fields))
        .ok_or_else(|| Error::parse(operation, "order", MISSING))?;
    let record = match record {
        OrderRecord::Transaction(mut fields) => {
            fields
                .entry("transactTime")
                .or_insert_with(|| Value::from(now.timestamp_millis()));
            OrderRecord::Transaction(fields)
        }
        open @ OrderRecord::Open(_) => open,
    };
    normalize_order(operation, record)
}

/// Per-currency balances from an account snapshot.
///
/// `available` is the free amount and `balance` the locked amount. Every
/// asset the vendor lists is included.
///
/// # Errors
///
/// Returns [`Error::Parse`] when an amount does not parse.
pub fn normalize_balances(operation: &'static str, account: &AccountInfo) -> Result<Balances> {
    let mut currencies = CurrencyBalances::with_capacity(account.balances.len());
    for entry in &account.balances {
        let balance = Balance {
            available: parse_decimal(operation, "free", &entry.free)?,
            balance: parse_decimal(operation, "locked", &entry.locked)?,
        };
        currencies.insert(entry.asset.clone(), balance);
    }

    let mut balances = Balances::with_capacity(1);
    balances.insert(ACCOUNT_SCOPE.to_string(), currencies);
    Ok(balances)
}

/// Product from one raw `exchangeInfo` symbol record.
///
/// Size limits come from the `PRICE_FILTER` entry. Without one they stay
/// `None`.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the record lacks symbol or asset fields, or
/// a filter value does not parse.
pub fn normalize_product(operation: &'static str, raw: &Value) -> Result<Product> {
    let info: SymbolInfo = serde_json::from_value(raw.clone())
        .map_err(|_| Error::parse(operation, "symbol", &raw.to_string()))?;

    let price_filter = info.filters.iter().find(|f| f.filter_type == PRICE_FILTER);
    let limit = |value: Option<&String>, field: &'static str| -> Result<Option<Price>> {
        value.map(|v| parse_decimal(operation, field, v)).transpose()
    };
    let (base_min_size, base_max_size, quote_increment) = match price_filter {
        Some(filter) => (
            limit(filter.min_price.as_ref(), "minPrice")?,
            limit(filter.max_price.as_ref(), "maxPrice")?,
            limit(filter.tick_size.as_ref(), "tickSize")?,
        ),
        None => (None, None, None),
    };

    Ok(Product {
        id: from_vendor_symbol(&info.symbol),
        source_id: info.symbol,
        base_currency: info.base_asset,
        quote_currency: info.quote_asset,
        base_min_size,
        base_max_size,
        quote_increment,
        source_data: raw.clone(),
    })
}

/// Ticker from the rolling 24h statistics.
///
/// `price` is the last traded price. A negative `lastId` (no trades in the
/// window) yields no trade id.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a price or volume does not parse.
pub fn normalize_ticker(
    operation: &'static str,
    product_id: &str,
    ticker: &Ticker24h,
) -> Result<Ticker> {
    Ok(Ticker {
        product_id: product_id.to_string(),
        price: parse_decimal(operation, "lastPrice", &ticker.last_price)?,
        bid: parse_decimal(operation, "bidPrice", &ticker.bid_price)?,
        ask: parse_decimal(operation, "askPrice", &ticker.ask_price)?,
        volume: parse_decimal(operation, "volume", &ticker.volume)?,
        time: parse_millis(operation, "closeTime", ticker.close_time)?,
        trade_id: ticker.last_id.filter(|id| *id >= 0),
    })
}

/// Midpoint of the ticker's bid and ask.
///
/// # Errors
///
/// Returns [`Error::Parse`] when either quote does not parse.
pub fn mid_market_price(operation: &'static str, ticker: &Ticker24h) -> Result<Price> {
    let bid = parse_decimal(operation, "bidPrice", &ticker.bid_price)?;
    let ask = parse_decimal(operation, "askPrice", &ticker.ask_price)?;
    Ok((bid + ask) / Decimal::TWO)
}

/// Candles from kline rows, in vendor order.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a row value does not parse.
pub fn normalize_candles(operation: &'static str, rows: &[Kline]) -> Result<Vec<Candle>> {
    rows.iter()
        .map(|row| {
            Ok(Candle {
                timestamp: parse_millis(operation, "openTime", row.open_time)?,
                open: parse_decimal(operation, "open", &row.open)?,
                high: parse_decimal(operation, "high", &row.high)?,
                low: parse_decimal(operation, "low", &row.low)?,
                close: parse_decimal(operation, "close", &row.close)?,
                volume: parse_decimal(operation, "volume", &row.volume)?,
            })
        })
        .collect()
}
