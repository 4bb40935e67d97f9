//! HTTP surface: the listing page and the four ajax actions the popup
//! script consumes.
//!
//! Wire convention (host framework's): `{"success": true, "data": …}` on
//! success, `{"success": false, "data": …}` on failure. Failures carry no
//! machine-readable reason; the real cause is logged server-side only.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use crate::config::SettingsStore;
use crate::render;
use crate::services::{CartService, CatalogService};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub catalog: Arc<dyn CatalogService>,
    pub cart: Arc<dyn CartService>,
    pub checkout_url: String,
}

pub const AJAX_BASE: &str = "/ajax";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/shop", get(shop_page))
        .route("/ajax/get_product_variations", post(get_product_variations))
        .route("/ajax/get_cart_count", post(get_cart_count))
        .route("/ajax/add_variation_to_cart", post(add_variation_to_cart))
        .route("/ajax/get_cart_fragments", post(get_cart_fragments))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn ajax_success(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn ajax_error(data: Value) -> Json<Value> {
    Json(json!({ "success": false, "data": data }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "storefront-popup" }))
}

/// The rendered listing page: one button pair per catalog product plus the
/// popup markup, styles and script.
async fn shop_page(State(s): State<AppState>) -> Html<String> {
    let settings = s.settings.get();
    let products = s.catalog.products();
    Html(render::listing_page(
        &settings,
        &products,
        s.cart.contents_count(),
        &s.checkout_url,
        AJAX_BASE,
    ))
}

/// Raw form fields. Ids arrive as text and are parsed by hand so a
/// malformed body still gets the JSON envelope instead of a 422.
#[derive(Debug, Deserialize)]
pub struct VariationsRequest {
    #[serde(default)]
    pub product_id: String,
}

#[derive(Debug, Serialize)]
pub struct VariationData {
    pub variation_id: u64,
    pub attributes: String,
    pub price: String,
    pub is_in_stock: bool,
}

fn variations_payload(catalog: &dyn CatalogService, product_id: u64) -> crate::Result<Value> {
    let product = catalog
        .product(product_id)
        .ok_or(crate::PopupError::ProductNotFound)?;
    if !product.is_variable() {
        return Err(crate::PopupError::NotVariable);
    }
    let variations: Vec<VariationData> = product
        .variants()
        .iter()
        .map(|v| VariationData {
            variation_id: v.id,
            attributes: v.attributes.clone(),
            price: v.price.display(),
            is_in_stock: v.in_stock,
        })
        .collect();
    Ok(json!({ "title": product.name(), "variations": variations }))
}

/// Endpoint A: list a variable product's variants, in catalog order with
/// stock flags unchanged. Generic failure for anything that is not a
/// variable product.
async fn get_product_variations(
    State(s): State<AppState>,
    Form(req): Form<VariationsRequest>,
) -> Json<Value> {
    let Ok(product_id) = req.product_id.parse::<u64>() else {
        tracing::warn!(product_id = %req.product_id, "malformed variation request");
        return ajax_error(Value::Null);
    };
    match variations_payload(s.catalog.as_ref(), product_id) {
        Ok(data) => ajax_success(data),
        Err(e) => {
            tracing::warn!(product_id, error = %e, "variation lookup failed");
            ajax_error(Value::Null)
        }
    }
}

/// Endpoint B: the current cart contents count, for refreshing on-page
/// counter elements.
async fn get_cart_count(State(s): State<AppState>) -> Json<Value> {
    ajax_success(json!({ "count": s.cart.contents_count() }))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub variation_id: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Validate)]
pub struct AddToCartRequest {
    pub product_id: u64,
    pub variation_id: u64,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

impl AddToCartForm {
    fn parse(&self) -> Option<AddToCartRequest> {
        Some(AddToCartRequest {
            product_id: self.product_id.parse().ok()?,
            variation_id: self.variation_id.parse().ok()?,
            quantity: self.quantity.parse().ok()?,
        })
    }
}

/// Endpoint C: commit an add-to-cart. Success carries the updated count;
/// failure is deliberately generic: stale stock, unknown combination and
/// every other rejection look the same to the shopper.
async fn add_variation_to_cart(
    State(s): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Json<Value> {
    let Some(req) = form.parse() else {
        tracing::warn!(
            product_id = %form.product_id,
            variation_id = %form.variation_id,
            quantity = %form.quantity,
            "malformed add-to-cart request"
        );
        return ajax_error(json!({ "message": "Failed to add product to cart" }));
    };
    if req.validate().is_err() {
        tracing::warn!(quantity = req.quantity, "add-to-cart request failed validation");
        return ajax_error(json!({ "message": "Failed to add product to cart" }));
    }
    match s
        .cart
        .add_line_item(req.product_id, req.variation_id, req.quantity)
    {
        Ok(cart_count) => {
            tracing::info!(
                product_id = req.product_id,
                variation_id = req.variation_id,
                quantity = req.quantity,
                cart_count,
                "added variation to cart"
            );
            ajax_success(json!({ "message": "Product added to cart", "cart_count": cart_count }))
        }
        Err(e) => {
            tracing::warn!(
                product_id = req.product_id,
                variation_id = req.variation_id,
                error = %e,
                "add to cart rejected"
            );
            ajax_error(json!({ "message": "Failed to add product to cart" }))
        }
    }
}

/// Fragment refresh: opaque HTML snippets keyed by page-region selector.
/// No envelope; the payload matches the host framework's refresh response.
async fn get_cart_fragments(State(s): State<AppState>) -> Json<Value> {
    Json(json!({ "fragments": s.cart.fragments() }))
}
