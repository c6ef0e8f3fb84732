//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Volume represented as a Decimal for precision.
pub type Volume = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_and_volume_are_decimal() {
        let price: Price = dec!(0.00402030);
        let volume: Volume = dec!(5.0);

        assert_eq!(price * volume, dec!(0.02010150));
    }

    #[test]
    fn decimal_equality_ignores_trailing_zeros() {
        let a: Price = "10.5".parse().unwrap();
        let b: Price = "10.50".parse().unwrap();
        assert_eq!(a, b);
    }
}
