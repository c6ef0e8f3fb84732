//! Aggregated book from a Binance depth snapshot.

use super::dto::{RawBook, RawLevel};
use super::normalize::parse_decimal;
use crate::domain::{AggregatedBook, BookError, BookOrder, Price, PriceLevel, Side, Volume};
use crate::error::{Error, Result};

/// Build an aggregated book from a depth snapshot.
///
/// Each entry becomes a single-order level whose order id is the vendor
/// price string and whose size is the absolute quantity. Entries resolving
/// to a price already on that side are merged: the resting order's size
/// grows by the new absolute quantity.
/// The snapshot's sequence is 0.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a price or size does not parse, and
/// [`Error::Book`] when a level cannot be added or merged.
pub fn build_book(
    operation: &'static str,
    product_id: &str,
    raw: &RawBook,
) -> Result<AggregatedBook> {
    let mut book = AggregatedBook::new(product_id);
    add_side(operation, &mut book, Side::Buy, &raw.bids)?;
    add_side(operation, &mut book, Side::Sell, &raw.asks)?;
    book.set_sequence(0);
    Ok(book)
}

fn add_side(
    operation: &'static str,
    book: &mut AggregatedBook,
    side: Side,
    entries: &[RawLevel],
) -> Result<()> {
    for (raw_price, raw_size) in entries {
        let price = parse_decimal(operation, "price", raw_price)?;
        let size = parse_decimal(operation, "quantity", raw_size)?.abs();
        let level = PriceLevel::single(BookOrder::new(raw_price.clone(), price, size, side));

        match book.add_level(level) {
            Ok(()) => {}
            Err(BookError::LevelExists { .. }) => merge(operation, book, side, price, size)?,
            Err(source) => return Err(Error::Book { operation, source }),
        }
    }
    Ok(())
}

/// Grow the order resting at `price` by `size`.
fn merge(
    operation: &'static str,
    book: &mut AggregatedBook,
    side: Side,
    price: Price,
    size: Volume,
) -> Result<()> {
    let resting = book.order_at(side, price).ok_or(Error::Book {
        operation,
        source: BookError::OrderNotFound { side, price },
    })?;
    let id = resting.id.clone();
    let merged = resting.size + size;
    book.set_order_size(side, price, &id, merged)
        .map_err(|source| Error::Book { operation, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: &str, size: &str) -> RawLevel {
        (price.to_string(), size.to_string())
    }

    #[test]
    fn collisions_sum_into_one_level() {
        let raw = RawBook {
            last_update_id: Some(7),
            bids: vec![level("10.5", "1.0"), level("10.50", "2.0")],
            asks: vec![],
        };
        let book = build_book("load_orderbook", "BNB-BTC", &raw).unwrap();

        assert_eq!(book.depth(Side::Buy), 1);
        let level = book.level(Side::Buy, dec!(10.5)).unwrap();
        assert_eq!(level.orders().len(), 1);
        assert_eq!(level.total_size(), dec!(3.0));
        assert_eq!(level.orders()[0].id, "10.5");
    }

    #[test]
    fn sides_are_independent() {
        let raw = RawBook {
            last_update_id: None,
            bids: vec![level("4.00000000", "431.00000000"), level("3.9", "1")],
            asks: vec![level("4.00000000", "12.00000000"), level("4.1", "2")],
        };
        let book = build_book("load_orderbook", "BNB-BTC", &raw).unwrap();

        assert_eq!(book.depth(Side::Buy), 2);
        assert_eq!(book.depth(Side::Sell), 2);
        assert_eq!(book.best_bid().unwrap().price(), dec!(4));
        assert_eq!(book.best_ask().unwrap().price(), dec!(4));
        assert_eq!(book.level(Side::Sell, dec!(4)).unwrap().total_size(), dec!(12));
    }

    #[test]
    fn snapshot_sequence_is_zero() {
        let raw = RawBook {
            last_update_id: Some(1027024),
            ..RawBook::default()
        };
        let book = build_book("load_orderbook", "ETH-BTC", &raw).unwrap();
        assert_eq!(book.sequence(), 0);
        assert!(book.is_empty());
        assert_eq!(book.product_id(), "ETH-BTC");
    }

    #[test]
    fn merged_sizes_use_absolute_values() {
        let raw = RawBook {
            last_update_id: None,
            bids: vec![],
            asks: vec![level("5", "-1.5"), level("5.0", "0.5")],
        };
        let book = build_book("load_orderbook", "LTC-BTC", &raw).unwrap();
        assert_eq!(book.level(Side::Sell, dec!(5)).unwrap().total_size(), dec!(2));
    }

    #[test]
    fn bad_quantity_is_a_parse_error() {
        let raw = RawBook {
            last_update_id: None,
            bids: vec![level("1", "x")],
            asks: vec![],
        };
        let err = build_book("load_orderbook", "LTC-BTC", &raw).unwrap_err();
        assert!(matches!(err, Error::Parse { field: "quantity", .. }));
    }

    #[test]
    fn merge_without_resting_order_is_an_error() {
        let mut book = AggregatedBook::new("LTC-BTC");
        let err = merge("load_orderbook", &mut book, Side::Buy, dec!(1), dec!(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::Book {
                operation: "load_orderbook",
                source: BookError::OrderNotFound { side: Side::Buy, .. },
            }
        ));
        assert!(book.is_empty());
    }
}
