//! Command-line interface definitions.
//!
//! Every subcommand maps onto one exchange port operation. Market data
//! commands work without credentials; account commands need them in the
//! configuration file or the environment.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use super::paths;
use crate::domain::Side;

/// Binance market data and order management from the command line
#[derive(Parser, Debug)]
#[command(name = "coinbridge")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the coinbridge CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the 24h ticker for a product
    Ticker(ProductArg),

    /// Show the aggregated order book for a product
    Book(BookArgs),

    /// Show historical candles
    Candles(CandleArgs),

    /// List every product on the exchange
    Products,

    /// Show the mid-market price for a product
    Mid(ProductArg),

    /// Show account balances
    Balances,

    /// List orders: history for one product, or every open order
    Orders(OrdersArgs),

    /// Show one order
    Order(OrderRefArgs),

    /// Place a new order
    Place(PlaceArgs),

    /// Cancel one order
    Cancel(OrderRefArgs),

    /// Cancel every open order
    CancelAll(OrdersArgs),
}

/// A single canonical product id.
#[derive(Args, Debug)]
pub struct ProductArg {
    /// Canonical product id, e.g. BNB-BTC
    pub product: String,
}

/// Arguments for `coinbridge book`.
#[derive(Args, Debug)]
pub struct BookArgs {
    /// Canonical product id, e.g. BNB-BTC
    pub product: String,

    /// Number of levels to print per side
    #[arg(short, long, default_value_t = 10)]
    pub levels: usize,
}

/// Arguments for `coinbridge candles`.
#[derive(Args, Debug)]
pub struct CandleArgs {
    /// Canonical product id, e.g. BNB-BTC
    pub product: String,

    /// Interval code (1m, 5m, 1h, 1d, ...)
    #[arg(short, long, default_value = "1h")]
    pub interval: String,

    /// Maximum number of candles
    #[arg(short, long)]
    pub limit: Option<u16>,

    /// Only candles opening at or after this RFC 3339 instant
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,
}

/// Optional product filter.
#[derive(Args, Debug)]
pub struct OrdersArgs {
    /// Canonical product id; omit for every product
    pub product: Option<String>,
}

/// An order id with the product it belongs to.
#[derive(Args, Debug)]
pub struct OrderRefArgs {
    /// Vendor order id
    pub id: String,

    /// Canonical product id, e.g. BNB-BTC
    pub product: String,
}

/// Arguments for `coinbridge place`.
#[derive(Args, Debug)]
pub struct PlaceArgs {
    /// Canonical product id, e.g. BNB-BTC
    pub product: String,

    /// Order side
    #[arg(value_enum)]
    pub side: SideArg,

    /// Order size in the base currency
    pub size: Decimal,

    /// Limit price; required unless --market is set
    #[arg(required_unless_present = "market", conflicts_with = "market")]
    pub price: Option<Decimal>,

    /// Submit a market order
    #[arg(long)]
    pub market: bool,

    /// Client order id
    #[arg(long)]
    pub client_id: Option<String>,
}

/// Order side as typed on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SideArg {
    Buy,
    Sell,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Buy => Self::Buy,
            SideArg::Sell => Self::Sell,
        }
    }
}
