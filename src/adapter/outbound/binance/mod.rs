//! Binance spot exchange integration.
//!
//! [`BinanceExchange`] implements the canonical exchange traits on top of a
//! [`VendorTransport`]. [`RestTransport`] is the production transport.

pub mod auth;
pub mod book;
pub mod classify;
pub mod dto;
pub mod exchange;
pub mod normalize;
pub mod orchestrate;
pub mod rest;
pub mod server_time;
pub mod settings;
pub mod symbol;
pub mod transport;

pub use exchange::BinanceExchange;
pub use rest::RestTransport;
pub use settings::{AuthConfig, BinanceConfig, BinanceOptions};
pub use transport::{RawFailure, VendorTransport};
