//! Inbound adapters that drive the exchange ports.

pub mod cli;
