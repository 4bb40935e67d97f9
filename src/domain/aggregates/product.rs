//! Product Aggregate
//!
//! Read-only view of catalog products as this service sees them. Products
//! are owned by the Catalog Service; nothing here mutates them.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    id: u64,
    name: String,
    kind: ProductKind,
    #[serde(default)]
    variants: Vec<Variant>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Simple,
    Variable,
}

/// One purchasable configuration of a variable product. `attributes` is the
/// human-readable combination label, e.g. "Red - Large".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    pub attributes: String,
    pub price: Money,
    pub in_stock: bool,
}

impl Product {
    pub fn simple(id: u64, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), kind: ProductKind::Simple, variants: vec![] }
    }

    pub fn variable(id: u64, name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self { id, name: name.into(), kind: ProductKind::Variable, variants }
    }

    pub fn id(&self) -> u64 { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> ProductKind { self.kind }
    pub fn is_variable(&self) -> bool { self.kind == ProductKind::Variable }

    /// Variants in catalog order. Empty for simple products.
    pub fn variants(&self) -> &[Variant] { &self.variants }

    pub fn variant(&self, variant_id: u64) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn variant(id: u64, attrs: &str, in_stock: bool) -> Variant {
        Variant {
            id,
            attributes: attrs.to_string(),
            price: Money::usd(Decimal::new(1000, 2)),
            in_stock,
        }
    }

    #[test]
    fn test_simple_product_has_no_variants() {
        let p = Product::simple(7, "Mug");
        assert!(!p.is_variable());
        assert!(p.variants().is_empty());
    }

    #[test]
    fn test_variant_lookup() {
        let p = Product::variable(101, "Shirt", vec![variant(5, "Small", true), variant(6, "Large", false)]);
        assert!(p.is_variable());
        assert_eq!(p.variant(5).unwrap().attributes, "Small");
        assert!(p.variant(9).is_none());
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ProductKind::Variable).unwrap();
        assert_eq!(json, "\"variable\"");
    }
}
