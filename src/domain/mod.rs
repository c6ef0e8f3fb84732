//! Exchange-agnostic domain types.
//!
//! Every adapter normalizes vendor responses into these values. They are
//! plain request-scoped data: built fresh per response and owned by the
//! caller.

pub mod balance;
pub mod book;
pub mod market;
pub mod money;
pub mod order;
pub mod product;

pub use balance::{Balance, Balances, CurrencyBalances};
pub use book::{AggregatedBook, BookError, BookOrder, PriceLevel};
pub use market::{Candle, CandleRequest, Ticker};
pub use money::{Price, Volume};
pub use order::{LiveOrder, OrderType, PlaceOrder, Side, TimeInForce};
pub use product::Product;
