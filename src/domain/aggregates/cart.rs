//! Cart Aggregate

use chrono::{DateTime, Utc};

use crate::domain::value_objects::Quantity;

/// The shopper's cart. Lines are keyed by (product, variant); adding the
/// same key again merges quantities instead of appending a duplicate line.
#[derive(Clone, Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: u64,
    pub variant_id: Option<u64>,
    pub quantity: u32,
}

impl Cart {
    pub fn new() -> Self {
        Self { lines: vec![], updated_at: Utc::now() }
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Total number of items, summed across line quantities. This is the
    /// number on-page cart counters show, not the number of distinct lines.
    pub fn contents_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn add_line(&mut self, product_id: u64, variant_id: Option<u64>, quantity: Quantity) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id && l.variant_id == variant_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity.value());
        } else {
            self.lines.push(CartLine { product_id, variant_id, quantity: quantity.value() });
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self { Self::new() }
}
