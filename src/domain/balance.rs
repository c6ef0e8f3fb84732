//! Account balances.

use std::collections::HashMap;

use serde::Serialize;

use super::money::Volume;

/// Funds held in a single currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Funds free to trade or withdraw.
    pub available: Volume,
    /// Funds locked in open orders.
    pub balance: Volume,
}

/// Currency code to balance.
pub type CurrencyBalances = HashMap<String, Balance>;

/// Account scope to per-currency balances.
pub type Balances = HashMap<String, CurrencyBalances>;
