//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`transport`] - `ScriptedTransport`, an in-memory
//!   [`VendorTransport`](crate::adapter::outbound::binance::VendorTransport)
//!   with scripted responses and call recording.
//! - [`vendor`] - Builders for Binance payloads: orders, tickers, accounts.

pub mod transport;
pub mod vendor;

pub use transport::{ScriptedTransport, TransportCall, TransportMethod};
