//! Button style settings and the settings store.
//!
//! Everything here is read-only at request time. Settings are mutated only
//! through the administrative side (out of scope for this service beyond
//! the `SettingsStore` CRUD), and are handed to the renderer as a plain
//! value rather than read from ambient global state.

use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::{PopupError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    pub buy_now: ButtonStyle,
    pub add_to_cart: ButtonStyle,
    pub height_px: u32,
    pub font_size_px: u32,
    pub radius_px: u32,
    pub icon_position: IconPosition,
    pub messages: Messages,
}

/// Per-role button appearance. `icon` is an optional glyph (emoji or text);
/// when unset the label is the bare text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonStyle {
    pub text: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPosition {
    #[default]
    Left,
    Right,
}

/// Shopper-facing strings, configurable the same way button text is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub variant_heading: String,
    pub quantity_label: String,
    pub select_variant_warning: String,
    pub committing: String,
    pub add_success: String,
    pub commit_failure: String,
    pub out_of_stock_tag: String,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            buy_now: ButtonStyle {
                text: "Buy Now".to_string(),
                color: "#FF6B35".to_string(),
                icon: None,
            },
            add_to_cart: ButtonStyle {
                text: "Add to Cart".to_string(),
                color: "#28a745".to_string(),
                icon: None,
            },
            height_px: 45,
            font_size_px: 15,
            radius_px: 5,
            icon_position: IconPosition::Left,
            messages: Messages::default(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            variant_heading: "Choose an option:".to_string(),
            quantity_label: "Quantity:".to_string(),
            select_variant_warning: "Please select an option first!".to_string(),
            committing: "Please wait...".to_string(),
            add_success: "Added to cart! Refreshing...".to_string(),
            commit_failure: "Something went wrong!".to_string(),
            out_of_stock_tag: "(out of stock)".to_string(),
        }
    }
}

impl PopupSettings {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| PopupError::Settings(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| PopupError::Settings(format!("{}: {e}", path.display())))
    }

    /// Button label: the configured text, icon-prefixed or -suffixed per
    /// the configured position, or the bare text when no icon is set.
    pub fn label_for(&self, style: &ButtonStyle) -> String {
        match style.icon.as_deref().map(str::trim) {
            Some(icon) if !icon.is_empty() => match self.icon_position {
                IconPosition::Left => format!("{icon} {}", style.text),
                IconPosition::Right => format!("{} {icon}", style.text),
            },
            _ => style.text.clone(),
        }
    }

    pub fn buy_now_label(&self) -> String {
        self.label_for(&self.buy_now)
    }

    pub fn add_to_cart_label(&self) -> String {
        self.label_for(&self.add_to_cart)
    }
}

/// Current settings behind a lock: read on every render, replaced whole by
/// the administrative form's save.
pub struct SettingsStore {
    inner: RwLock<PopupSettings>,
}

impl SettingsStore {
    pub fn new(settings: PopupSettings) -> Self {
        Self { inner: RwLock::new(settings) }
    }

    pub fn get(&self) -> PopupSettings {
        self.inner.read().expect("settings lock poisoned").clone()
    }

    pub fn replace(&self, settings: PopupSettings) {
        *self.inner.write().expect("settings lock poisoned") = settings;
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(PopupSettings::default())
    }
}
