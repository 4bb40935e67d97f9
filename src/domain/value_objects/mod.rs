//! Value objects for the popup domain

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }

    /// Shopper-facing price string, e.g. `$25.00` or `5.00 SEK`.
    pub fn display(&self) -> String {
        match self.currency.as_str() {
            "USD" => format!("${:.2}", self.amount),
            "EUR" => format!("€{:.2}", self.amount),
            "GBP" => format!("£{:.2}", self.amount),
            "BDT" => format!("৳{:.2}", self.amount),
            other => format!("{:.2} {}", self.amount, other),
        }
    }
}

impl Default for Money {
    fn default() -> Self { Self::zero("USD") }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Quantity value object. A commit quantity is always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }
    pub fn value(&self) -> u32 { self.0 }
}

impl Default for Quantity {
    fn default() -> Self { Self(1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        let m = Money::usd(Decimal::new(2500, 2));
        assert_eq!(m.display(), "$25.00");
        let m = Money::new(Decimal::new(19990, 2), "BDT");
        assert_eq!(m.display(), "৳199.90");
        let m = Money::new(Decimal::new(5, 0), "SEK");
        assert_eq!(m.display(), "5.00 SEK");
    }

    #[test]
    fn test_quantity_rejects_zero() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(3).unwrap().value(), 3);
        assert_eq!(Quantity::default().value(), 1);
    }
}
