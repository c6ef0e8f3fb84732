//! Aggregated order book types.
//!
//! This module provides the side-indexed book that exchange adapters
//! reconstruct from raw depth data:
//!
//! - [`BookOrder`] - One resting order (or an aggregate standing in for one)
//! - [`PriceLevel`] - All orders resting at one price on one side
//! - [`AggregatedBook`] - Bids and asks for a single product
//!
//! # Book Structure
//!
//! Each side holds at most one [`PriceLevel`] per distinct price. Prices are
//! compared by decimal value, so `10.5` and `10.50` are the same level.
//! Adding a level at an occupied price is rejected with
//! [`BookError::LevelExists`]; callers merge into the existing level instead.
//!
//! - **Bids**: iterated by price descending (best bid first)
//! - **Asks**: iterated by price ascending (best ask first)
//!
//! # Examples
//!
//! ```
//! use coinbridge::domain::book::{AggregatedBook, BookOrder, PriceLevel};
//! use coinbridge::domain::order::Side;
//! use rust_decimal_macros::dec;
//!
//! let mut book = AggregatedBook::new("BNB-BTC");
//! book.add_level(PriceLevel::single(BookOrder::new("0.0105", dec!(0.0105), dec!(3), Side::Buy)))
//!     .unwrap();
//! book.add_level(PriceLevel::single(BookOrder::new("0.0107", dec!(0.0107), dec!(1), Side::Sell)))
//!     .unwrap();
//!
//! assert_eq!(book.best_bid().unwrap().price(), dec!(0.0105));
//! assert_eq!(book.best_ask().unwrap().price(), dec!(0.0107));
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::money::{Price, Volume};
use super::order::Side;

/// Errors raised when mutating an [`AggregatedBook`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("{side} level at {price} already exists")]
    LevelExists { side: Side, price: Price },

    #[error("no {side} order at {price}")]
    OrderNotFound { side: Side, price: Price },

    #[error("level must hold at least one order")]
    EmptyLevel,
}

/// A single order resting in the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookOrder {
    pub id: String,
    pub price: Price,
    pub size: Volume,
    pub side: Side,
}

impl BookOrder {
    #[must_use]
    pub fn new(id: impl Into<String>, price: Price, size: Volume, side: Side) -> Self {
        Self {
            id: id.into(),
            price,
            size,
            side,
        }
    }
}

/// All orders at one price on one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    price: Price,
    side: Side,
    orders: Vec<BookOrder>,
}

impl PriceLevel {
    /// Creates a level holding exactly one order.
    #[must_use]
    pub fn single(order: BookOrder) -> Self {
        Self {
            price: order.price,
            side: order.side,
            orders: vec![order],
        }
    }

    /// Creates a level from several orders at the same price and side.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::EmptyLevel`] when `orders` is empty.
    pub fn try_new(price: Price, side: Side, orders: Vec<BookOrder>) -> Result<Self, BookError> {
        if orders.is_empty() {
            return Err(BookError::EmptyLevel);
        }
        Ok(Self {
            price,
            side,
            orders,
        })
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn orders(&self) -> &[BookOrder] {
        &self.orders
    }

    /// Total size resting at this level.
    #[must_use]
    pub fn total_size(&self) -> Volume {
        self.orders.iter().map(|o| o.size).sum()
    }
}

/// Side-indexed order book for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedBook {
    product_id: String,
    sequence: u64,
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
}

impl AggregatedBook {
    /// Creates an empty book with sequence 0.
    #[must_use]
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            sequence: 0,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn side_ref(&self, side: Side) -> &BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Adds a new level on the level's side.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::LevelExists`] if that side already has a level at
    /// the same price. The book is left unchanged.
    pub fn add_level(&mut self, level: PriceLevel) -> Result<(), BookError> {
        let side = level.side;
        let price = level.price;
        let levels = self.side_mut(side);
        if levels.contains_key(&price) {
            return Err(BookError::LevelExists { side, price });
        }
        levels.insert(price, level);
        Ok(())
    }

    /// Level at `price`, if any.
    #[must_use]
    pub fn level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        self.side_ref(side).get(&price)
    }

    /// First order resting at `price`.
    #[must_use]
    pub fn order_at(&self, side: Side, price: Price) -> Option<&BookOrder> {
        self.level(side, price).and_then(|level| level.orders.first())
    }

    /// Overwrites the size of order `id` at `price`.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::OrderNotFound`] when no such order rests there.
    pub fn set_order_size(
        &mut self,
        side: Side,
        price: Price,
        id: &str,
        size: Volume,
    ) -> Result<(), BookError> {
        let order = self
            .side_mut(side)
            .get_mut(&price)
            .and_then(|level| level.orders.iter_mut().find(|o| o.id == id))
            .ok_or(BookError::OrderNotFound { side, price })?;
        order.size = size;
        Ok(())
    }

    /// Bid levels, best (highest) first.
    pub fn bids(&self) -> impl Iterator<Item = &PriceLevel> {
        self.bids.values().rev()
    }

    /// Ask levels, best (lowest) first.
    pub fn asks(&self) -> impl Iterator<Item = &PriceLevel> {
        self.asks.values()
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.values().next_back()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.values().next()
    }

    /// Number of levels on `side`.
    #[must_use]
    pub fn depth(&self, side: Side) -> usize {
        self.side_ref(side).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

impl Serialize for AggregatedBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AggregatedBook", 4)?;
        state.serialize_field("product_id", &self.product_id)?;
        state.serialize_field("sequence", &self.sequence)?;
        state.serialize_field("bids", &self.bids().collect::<Vec<_>>())?;
        state.serialize_field("asks", &self.asks().collect::<Vec<_>>())?;
        state.end()
    }
}
