//! Domain model: catalog types, the cart aggregate and the
//! variant-selection state machine.

pub mod aggregates;
pub mod selection;
pub mod value_objects;

pub use aggregates::{Cart, CartLine, Product, ProductKind, Variant};
pub use selection::{
    ActionIntent, CheckoutSubmission, CommitAction, CommitOutcome, PopupState, SelectionSession,
    VariantOption,
};
pub use value_objects::{Money, Quantity};
