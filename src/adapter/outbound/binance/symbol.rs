//! Translation between canonical product ids and Binance symbols.
//!
//! Canonical ids are `BASE-QUOTE` (`BNB-BTC`); Binance concatenates the two
//! (`BNBBTC`). Known pairs live in a static override table. Reverse
//! translation assumes a three-character base and a three-character quote,
//! which is exact for every pair in the table and approximate elsewhere
//! (`BTCUSDT` becomes `BTC-USD`).

/// Canonical product id to Binance symbol for the supported pairs.
static PRODUCT_MAP: &[(&str, &str)] = &[
    ("BNB-BTC", "BNBBTC"),
    ("BNB-ETH", "BNBETH"),
    ("LTC-USD", "LTCUSD"),
    ("LTC-BTC", "LTCBTC"),
    ("ETH-USD", "ETHUSD"),
    ("ETH-BTC", "ETHBTC"),
];

const BASE_WIDTH: usize = 3;
const QUOTE_WIDTH: usize = 3;

/// Canonical ids with an explicit mapping.
pub fn known_products() -> impl Iterator<Item = &'static str> {
    PRODUCT_MAP.iter().map(|(canonical, _)| *canonical)
}

/// Binance symbol for a canonical product id.
///
/// Ids missing from the override table pass through unchanged.
#[must_use]
pub fn to_vendor_symbol(canonical_id: &str) -> String {
    PRODUCT_MAP
        .iter()
        .find(|(canonical, _)| *canonical == canonical_id)
        .map_or_else(|| canonical_id.to_string(), |(_, vendor)| (*vendor).to_string())
}

/// Canonical product id for a Binance symbol.
///
/// Splits after the third and sixth characters. Anything past the sixth
/// character is dropped, and shorter symbols keep whatever characters exist.
#[must_use]
pub fn from_vendor_symbol(vendor_symbol: &str) -> String {
    let mut chars = vendor_symbol.chars();
    let base: String = chars.by_ref().take(BASE_WIDTH).collect();
    let quote: String = chars.take(QUOTE_WIDTH).collect();
    format!("{base}-{quote}")
}
