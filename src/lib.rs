//! Storefront Popup Service
//!
//! Replaces a shop's default add-to-cart control with a dual-button
//! (Buy Now / Add to Cart) widget and a variant-selection popup.
//!
//! ## Features
//! - Dual action buttons per listing-page product
//! - Popup variant selection with quantity for variable products
//! - Direct checkout (Buy Now) and ajax add-to-cart paths
//! - Real-time cart count and fragment refresh
//! - Fully customizable button text, colors, icons and dimensions

use thiserror::Error;

pub mod app;
pub mod config;
pub mod domain;
pub mod render;
pub mod services;

pub use app::{build_router, AppState};
pub use config::{PopupSettings, SettingsStore};
pub use services::{CartService, CatalogService, MemoryCart, MemoryCatalog};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PopupError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Product has no selectable variants")]
    NotVariable,

    #[error("Variant not found for product")]
    UnknownVariant,

    #[error("Variant is out of stock")]
    OutOfStock,

    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("No variant selected")]
    NoVariantSelected,

    #[error("Action not available in the current popup state")]
    InvalidTransition,

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PopupError>;
