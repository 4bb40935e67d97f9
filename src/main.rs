//! Storefront Popup - dual-button Buy Now / Add to Cart widget service

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_popup::domain::aggregates::Product;
use storefront_popup::{
    build_router, AppState, MemoryCart, MemoryCatalog, PopupSettings, SettingsStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match std::env::var("SETTINGS_PATH") {
        Ok(path) => PopupSettings::from_path(Path::new(&path))
            .with_context(|| format!("loading settings from {path}"))?,
        Err(_) => PopupSettings::default(),
    };

    let catalog = match std::env::var("CATALOG_PATH") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading catalog from {path}"))?;
            let products: Vec<Product> =
                serde_json::from_str(&raw).with_context(|| format!("parsing catalog {path}"))?;
            tracing::info!(count = products.len(), path = %path, "catalog loaded");
            MemoryCatalog::new(products)
        }
        Err(_) => {
            tracing::info!("no CATALOG_PATH set, using demo catalog");
            MemoryCatalog::demo()
        }
    };

    let checkout_url = std::env::var("CHECKOUT_URL").unwrap_or_else(|_| "/checkout".to_string());
    let catalog = Arc::new(catalog);
    let state = AppState {
        settings: Arc::new(SettingsStore::new(settings)),
        cart: Arc::new(MemoryCart::new(catalog.clone())),
        catalog,
        checkout_url,
    };
    let app = build_router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{port}");
    tracing::info!("storefront-popup listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
