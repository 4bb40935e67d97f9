//! Catalog and cart collaborators.
//!
//! The popup service does not own product or cart data; the host storefront
//! does. These traits are the seams the handlers and the selection workflow
//! talk through, so the workflow stays testable in isolation. The in-memory
//! implementations back the standalone binary and the tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::domain::aggregates::{Cart, Product};
use crate::domain::value_objects::Quantity;
use crate::render;
use crate::{PopupError, Result};

/// Product lookup by identifier. Read-only.
pub trait CatalogService: Send + Sync {
    fn product(&self, product_id: u64) -> Option<Product>;
    /// All listing-page products, in stable id order.
    fn products(&self) -> Vec<Product>;
}

/// The shared cart. `add_line_item` returns the updated contents count on
/// success; every rejection collapses to an error with no machine-readable
/// reason on the wire.
pub trait CartService: Send + Sync {
    fn add_line_item(&self, product_id: u64, variation_id: u64, quantity: u32) -> Result<u32>;
    fn contents_count(&self) -> u32;
    /// Opaque HTML snippets keyed by page-region selector, for refreshing
    /// cart UI without a page reload.
    fn fragments(&self) -> BTreeMap<String, String>;
}

// =============================================================================
// In-memory implementations
// =============================================================================

pub struct MemoryCatalog {
    products: HashMap<u64, Product>,
}

impl MemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id(), p)).collect(),
        }
    }

    /// Small fixed catalog so the binary runs without a catalog file.
    pub fn demo() -> Self {
        use crate::domain::aggregates::Variant;
        use crate::domain::value_objects::Money;
        use rust_decimal::Decimal;

        let price = |cents: i64| Money::usd(Decimal::new(cents, 2));
        Self::new(vec![
            Product::simple(7, "Ceramic Mug"),
            Product::variable(
                101,
                "Classic Tee",
                vec![
                    Variant { id: 5, attributes: "Small".into(), price: price(2500), in_stock: true },
                    Variant { id: 6, attributes: "Large".into(), price: price(2500), in_stock: false },
                    Variant { id: 8, attributes: "Medium".into(), price: price(2500), in_stock: true },
                ],
            ),
        ])
    }
}

impl CatalogService for MemoryCatalog {
    fn product(&self, product_id: u64) -> Option<Product> {
        self.products.get(&product_id).cloned()
    }

    fn products(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.values().cloned().collect();
        all.sort_by_key(Product::id);
        all
    }
}

pub struct MemoryCart {
    catalog: Arc<dyn CatalogService>,
    cart: RwLock<Cart>,
}

impl MemoryCart {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog, cart: RwLock::new(Cart::new()) }
    }
}

impl CartService for MemoryCart {
    fn add_line_item(&self, product_id: u64, variation_id: u64, quantity: u32) -> Result<u32> {
        let quantity = Quantity::new(quantity).ok_or(PopupError::InvalidQuantity)?;
        let product = self
            .catalog
            .product(product_id)
            .ok_or(PopupError::ProductNotFound)?;
        let variant = product
            .variant(variation_id)
            .ok_or(PopupError::UnknownVariant)?;
        // Stock is re-checked here: a list fetched earlier may be stale.
        if !variant.in_stock {
            return Err(PopupError::OutOfStock);
        }
        let mut cart = self.cart.write().expect("cart lock poisoned");
        cart.add_line(product_id, Some(variation_id), quantity);
        Ok(cart.contents_count())
    }

    fn contents_count(&self) -> u32 {
        self.cart.read().expect("cart lock poisoned").contents_count()
    }

    fn fragments(&self) -> BTreeMap<String, String> {
        let count = self.contents_count();
        // The fragment payload covers the host's own cart regions. It does
        // not cover every custom counter element, which is why the client
        // re-applies the numeric count separately after replacing these.
        BTreeMap::from([
            (
                "div.widget_shopping_cart_content".to_string(),
                render::mini_cart_fragment(count),
            ),
            ("a.cart-contents".to_string(), render::cart_link_fragment(count)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Variant;
    use crate::domain::value_objects::Money;
    use rust_decimal::Decimal;

    fn catalog() -> Arc<MemoryCatalog> {
        Arc::new(MemoryCatalog::new(vec![
            Product::simple(7, "Mug"),
            Product::variable(
                101,
                "Tee",
                vec![
                    Variant { id: 5, attributes: "Small".into(), price: Money::usd(Decimal::new(2500, 2)), in_stock: true },
                    Variant { id: 6, attributes: "Large".into(), price: Money::usd(Decimal::new(2500, 2)), in_stock: false },
                ],
            ),
        ]))
    }

    #[test]
    fn test_add_line_item_returns_updated_count() {
        let cart = MemoryCart::new(catalog());
        assert_eq!(cart.add_line_item(101, 5, 2).unwrap(), 2);
        assert_eq!(cart.add_line_item(101, 5, 1).unwrap(), 3);
        assert_eq!(cart.contents_count(), 3);
    }

    #[test]
    fn test_add_rejections() {
        let cart = MemoryCart::new(catalog());
        assert!(matches!(cart.add_line_item(999, 5, 1), Err(PopupError::ProductNotFound)));
        assert!(matches!(cart.add_line_item(101, 999, 1), Err(PopupError::UnknownVariant)));
        assert!(matches!(cart.add_line_item(101, 6, 1), Err(PopupError::OutOfStock)));
        assert!(matches!(cart.add_line_item(101, 5, 0), Err(PopupError::InvalidQuantity)));
        assert_eq!(cart.contents_count(), 0);
    }

    #[test]
    fn test_fragments_cover_host_regions_only() {
        let cart = MemoryCart::new(catalog());
        cart.add_line_item(101, 5, 2).unwrap();
        let fragments = cart.fragments();
        assert!(fragments.contains_key("div.widget_shopping_cart_content"));
        assert!(fragments.contains_key("a.cart-contents"));
        // Custom counter spans are intentionally absent from the payload.
        assert!(!fragments.keys().any(|k| k.contains("cart-contents-count")));
        assert!(fragments["a.cart-contents"].contains('2'));
    }

    #[test]
    fn test_demo_catalog_matches_expected_shape() {
        let catalog = MemoryCatalog::demo();
        let tee = catalog.product(101).unwrap();
        assert!(tee.is_variable());
        assert!(tee.variant(6).is_some_and(|v| !v.in_stock));
        assert!(catalog.product(7).is_some_and(|p| !p.is_variable()));
    }
}
