//! Variant Selection Workflow
//!
//! The popup's interaction state, modeled as an explicit state value plus
//! transition guards. The selected variant is tracked by identifier here,
//! never inferred from how an option happens to be rendered.
//!
//! Transitions are driven strictly by sequential user and network events,
//! so there is no locking anywhere in this module. The `Committing` state
//! is what prevents a duplicate in-flight commit: every control-driven
//! transition is a guarded no-op or an error while a commit is pending.

use crate::domain::aggregates::Variant;
use crate::domain::value_objects::Quantity;
use crate::services::CartService;
use crate::{PopupError, Result};

/// What the shopper set out to do when the popup opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionIntent {
    AddToCart,
    BuyNow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupState {
    Closed,
    Loading,
    Open { selected: Option<u64> },
    Committing { selected: u64 },
}

/// One variant as offered in the popup: identifier, combination label,
/// price display string and stock flag, in catalog order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantOption {
    pub id: u64,
    pub attributes: String,
    pub price: String,
    pub in_stock: bool,
}

impl From<&Variant> for VariantOption {
    fn from(v: &Variant) -> Self {
        Self {
            id: v.id,
            attributes: v.attributes.clone(),
            price: v.price.display(),
            in_stock: v.in_stock,
        }
    }
}

/// The action a successful `begin_commit` hands back to the caller.
/// Buy Now never touches the cart; it yields a checkout submission instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitAction {
    CallCart { product_id: u64, variation_id: u64, quantity: u32 },
    SubmitCheckout(CheckoutSubmission),
}

/// A synthetic form post to the checkout destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutSubmission {
    fields: Vec<(String, String)>,
}

impl CheckoutSubmission {
    pub fn new(product_id: u64, variation_id: u64, quantity: u32) -> Self {
        Self {
            fields: vec![
                ("add-to-cart".to_string(), product_id.to_string()),
                ("variation_id".to_string(), variation_id.to_string()),
                ("quantity".to_string(), quantity.to_string()),
            ],
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// What a driven commit produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    AddedToCart { cart_count: u32 },
    Checkout(CheckoutSubmission),
}

/// Ephemeral per-popup state. Created when a button is clicked, discarded
/// when the popup closes or the action completes. Never persisted.
#[derive(Clone, Debug)]
pub struct SelectionSession {
    product_id: u64,
    intent: ActionIntent,
    quantity: Quantity,
    title: String,
    options: Vec<VariantOption>,
    state: PopupState,
}

impl SelectionSession {
    /// Closed -> Loading. Records the clicked product and the intent.
    pub fn open(product_id: u64, intent: ActionIntent) -> Self {
        Self {
            product_id,
            intent,
            quantity: Quantity::default(),
            title: String::new(),
            options: vec![],
            state: PopupState::Loading,
        }
    }

    pub fn product_id(&self) -> u64 { self.product_id }
    pub fn intent(&self) -> ActionIntent { self.intent }
    pub fn quantity(&self) -> u32 { self.quantity.value() }
    pub fn title(&self) -> &str { &self.title }
    pub fn options(&self) -> &[VariantOption] { &self.options }
    pub fn state(&self) -> &PopupState { &self.state }

    pub fn selected(&self) -> Option<u64> {
        match self.state {
            PopupState::Open { selected } => selected,
            PopupState::Committing { selected } => Some(selected),
            _ => None,
        }
    }

    /// Loading -> Open-Unselected, on a successful variant-list fetch.
    pub fn variations_loaded(&mut self, title: impl Into<String>, options: Vec<VariantOption>) -> Result<()> {
        if self.state != PopupState::Loading {
            return Err(PopupError::InvalidTransition);
        }
        self.title = title.into();
        self.options = options;
        self.state = PopupState::Open { selected: None };
        Ok(())
    }

    /// Highlight an in-stock variant. At most one variant is highlighted at
    /// a time; selecting a new one replaces the previous highlight.
    /// Selecting an out-of-stock or unknown variant is a no-op, as is any
    /// selection outside the Open states.
    pub fn select(&mut self, variant_id: u64) {
        let PopupState::Open { .. } = self.state else { return };
        let selectable = self
            .options
            .iter()
            .any(|o| o.id == variant_id && o.in_stock);
        if selectable {
            self.state = PopupState::Open { selected: Some(variant_id) };
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<()> {
        let PopupState::Open { .. } = self.state else {
            return Err(PopupError::InvalidTransition);
        };
        self.quantity = Quantity::new(quantity).ok_or(PopupError::InvalidQuantity)?;
        Ok(())
    }

    /// Open-Selected -> Committing. Refused with `NoVariantSelected` when
    /// nothing is highlighted; the caller shows the inline warning and no
    /// request is made.
    pub fn begin_commit(&mut self) -> Result<CommitAction> {
        let selected = match self.state {
            PopupState::Open { selected } => selected.ok_or(PopupError::NoVariantSelected)?,
            _ => return Err(PopupError::InvalidTransition),
        };
        self.state = PopupState::Committing { selected };
        Ok(match self.intent {
            ActionIntent::AddToCart => CommitAction::CallCart {
                product_id: self.product_id,
                variation_id: selected,
                quantity: self.quantity.value(),
            },
            ActionIntent::BuyNow => CommitAction::SubmitCheckout(CheckoutSubmission::new(
                self.product_id,
                selected,
                self.quantity.value(),
            )),
        })
    }

    /// Committing -> Open-Selected. The highlight survives so the shopper
    /// can retry without reselecting.
    pub fn commit_failed(&mut self) {
        if let PopupState::Committing { selected } = self.state {
            self.state = PopupState::Open { selected: Some(selected) };
        }
    }

    /// Committing -> Closed.
    pub fn commit_succeeded(&mut self) {
        if let PopupState::Committing { .. } = self.state {
            self.state = PopupState::Closed;
        }
    }

    /// Explicit close (close button or backdrop click). Discards all state.
    /// Ignored while a commit is in flight; the disabled controls cannot
    /// trigger it.
    pub fn close(&mut self) {
        match self.state {
            PopupState::Committing { .. } => {}
            _ => self.state = PopupState::Closed,
        }
    }

    /// Drive a commit against the cart collaborator. Add-to-cart delegates
    /// to the cart service; buy-now yields the checkout submission without
    /// any cart mutation.
    pub fn commit(&mut self, cart: &dyn CartService) -> Result<CommitOutcome> {
        match self.begin_commit()? {
            CommitAction::CallCart { product_id, variation_id, quantity } => {
                match cart.add_line_item(product_id, variation_id, quantity) {
                    Ok(cart_count) => {
                        self.commit_succeeded();
                        Ok(CommitOutcome::AddedToCart { cart_count })
                    }
                    Err(e) => {
                        self.commit_failed();
                        Err(e)
                    }
                }
            }
            CommitAction::SubmitCheckout(submission) => {
                self.commit_succeeded();
                Ok(CommitOutcome::Checkout(submission))
            }
        }
    }
}
