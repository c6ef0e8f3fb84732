//! Builders for Binance payloads used across tests.
//!
//! Each builder returns the JSON Binance would send, so tests can script a
//! [`ScriptedTransport`](super::ScriptedTransport) without spelling out
//! every vendor field.

use serde_json::{json, Value};

use crate::adapter::outbound::binance::transport::RawFailure;

/// An open order as listed by `openOrders`.
pub fn open_order(symbol: &str, order_id: i64) -> Value {
    json!({
        "symbol": symbol,
        "orderId": order_id,
        "clientOrderId": format!("client-{order_id}"),
        "price": "0.10000000",
        "origQty": "1.00000000",
        "executedQty": "0.00000000",
        "cummulativeQuoteQty": "0.00000000",
        "status": "NEW",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": "BUY",
        "stopPrice": "0.0",
        "icebergQty": "0.0",
        "time": 1_499_827_319_559_i64,
        "updateTime": 1_499_827_319_559_i64,
        "isWorking": true
    })
}

/// `count` open orders on `symbol` with ids `1..=count`.
pub fn open_orders(symbol: &str, count: i64) -> Value {
    Value::Array((1..=count).map(|id| open_order(symbol, id)).collect())
}

/// The full acknowledgement of a new order.
pub fn order_ack(symbol: &str, order_id: i64, side: &str) -> Value {
    json!({
        "symbol": symbol,
        "orderId": order_id,
        "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
        "transactTime": 1_507_725_176_595_i64,
        "price": "0.00240000",
        "origQty": "5.00000000",
        "executedQty": "0.00000000",
        "status": "NEW",
        "timeInForce": "GTC",
        "type": "LIMIT",
        "side": side
    })
}

/// 24h statistics with the given prices.
pub fn ticker(symbol: &str, last: &str, bid: &str, ask: &str) -> Value {
    json!({
        "symbol": symbol,
        "priceChange": "0.00000000",
        "lastPrice": last,
        "bidPrice": bid,
        "askPrice": ask,
        "volume": "8913.30000000",
        "openTime": 1_499_783_499_040_i64,
        "closeTime": 1_499_869_899_040_i64,
        "firstId": 28385,
        "lastId": 28460,
        "count": 76
    })
}

/// Account snapshot from `(asset, free, locked)` triples.
pub fn account(balances: &[(&str, &str, &str)]) -> Value {
    let balances: Vec<Value> = balances
        .iter()
        .map(|(asset, free, locked)| json!({"asset": asset, "free": free, "locked": locked}))
        .collect();
    json!({
        "makerCommission": 15,
        "takerCommission": 15,
        "canTrade": true,
        "balances": balances
    })
}

/// A rejection with Binance's `{code, msg}` body.
pub fn vendor_error(status: u16, code: i64, message: &str) -> RawFailure {
    RawFailure::http(status, json!({"code": code, "msg": message}).to_string())
}
