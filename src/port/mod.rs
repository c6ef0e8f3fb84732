//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture. Each
//! exchange adapter implements the same canonical contract so callers can
//! swap venues without touching their own code.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │        Caller           │
//!                    └────────────┬────────────┘
//!                                 │
//!                                 ▼
//!                    ┌─────────────────────────┐
//!                    │  Domain + Port          │
//!                    └────────────┬────────────┘
//!                                 │
//!                                 ▼
//!                    ┌─────────────────────────┐
//!                    │  Exchange Adapter       │
//!                    │  (Binance facade)       │
//!                    └─────────────────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`outbound::exchange::PublicExchange`] - Unauthenticated market data
//! - [`outbound::exchange::AuthenticatedExchange`] - Balances and order management

pub mod outbound;
