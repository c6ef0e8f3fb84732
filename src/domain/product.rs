//! Tradeable product metadata.

use serde::Serialize;

use super::money::Price;

/// A product listed on an exchange, keyed by its canonical id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Canonical id (`BASE-QUOTE`), derived from `source_id`.
    pub id: String,
    /// Vendor symbol.
    pub source_id: String,
    pub base_currency: String,
    pub quote_currency: String,
    /// `None` when the vendor published no limit; never defaulted to zero.
    pub base_min_size: Option<Price>,
    pub base_max_size: Option<Price>,
    pub quote_increment: Option<Price>,
    /// Raw vendor record, kept for diagnostics.
    pub source_data: serde_json::Value,
}
