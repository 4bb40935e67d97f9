//! Aggregates module
pub mod cart;
pub mod product;

pub use cart::{Cart, CartLine};
pub use product::{Product, ProductKind, Variant};
