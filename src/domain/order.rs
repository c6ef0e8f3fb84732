//! Order types shared by every exchange adapter.
//!
//! - [`Side`] - Buy or sell
//! - [`PlaceOrder`] - A request to open a new order
//! - [`LiveOrder`] - An order as reported back by an exchange

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::{Price, Volume};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid side of a book).
    Buy,
    /// Sell order (ask side of a book).
    Sell,
}

impl Side {
    /// Uppercase wire representation used by most venues.
    #[must_use]
    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type accepted by [`PlaceOrder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Limit,
    Market,
}

impl OrderType {
    #[must_use]
    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

/// How long a limit order stays on the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl TimeInForce {
    #[must_use]
    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

/// Request to place a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrder {
    /// Canonical product id (`BASE-QUOTE`).
    pub product_id: String,
    pub side: Side,
    #[serde(default)]
    pub order_type: OrderType,
    /// Base-currency quantity.
    pub size: Volume,
    /// Limit price. Ignored for market orders.
    #[serde(default)]
    pub price: Option<Price>,
    /// Defaults to GTC for limit orders.
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub client_order_id: Option<String>,
}

impl PlaceOrder {
    /// Creates a GTC limit order request.
    #[must_use]
    pub fn limit(product_id: impl Into<String>, side: Side, size: Volume, price: Price) -> Self {
        Self {
            product_id: product_id.into(),
            side,
            order_type: OrderType::Limit,
            size,
            price: Some(price),
            time_in_force: None,
            client_order_id: None,
        }
    }

    /// Creates a market order request.
    #[must_use]
    pub fn market(product_id: impl Into<String>, side: Side, size: Volume) -> Self {
        Self {
            product_id: product_id.into(),
            side,
            order_type: OrderType::Market,
            size,
            price: None,
            time_in_force: None,
            client_order_id: None,
        }
    }

    /// Attach a caller-chosen client order id.
    #[must_use]
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// An order as reported by an exchange.
///
/// `extra` keeps every vendor field without a canonical counterpart exactly
/// as the vendor sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveOrder {
    /// Canonical product id.
    pub product_id: String,
    /// Vendor order id, `None` when the vendor omitted it.
    pub id: Option<String>,
    pub price: Price,
    pub side: Side,
    pub size: Volume,
    /// Vendor status string (`NEW`, `FILLED`, ...).
    pub status: String,
    pub time: DateTime<Utc>,
    pub extra: BTreeMap<String, serde_json::Value>,
}
