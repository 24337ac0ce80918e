//! Command implementations.
//!
//! Each command prints human-readable output to stdout and returns
//! `bookstore_storefront::Result`; `main` reports failures.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod slider;

use bookstore_core::Price;

/// Currency suffix shown after every amount.
const CURRENCY: &str = "zł";

/// Format an amount, or the placeholder when it is unknown.
pub fn money(price: Option<Price>) -> String {
    price.map_or_else(
        || bookstore_core::catalog::UNKNOWN_PRICE.to_string(),
        |p| format!("{p} {CURRENCY}"),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(Some(Price::parse("25.5").unwrap())), "25.50 zł");
        assert_eq!(money(None), "N/A");
    }
}
