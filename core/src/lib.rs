//! Domain core for the item list service.
//!
//! # Overview
//! An item is a to-do entry with a name, a quantity and a done flag. This
//! crate owns everything about items that is independent of HTTP: the
//! entity, its identifier format, payload validation, the failure taxonomy
//! and the persistence gateway.
//!
//! # Design
//! - Validation is storage-agnostic. Handlers call `validate_for_create` /
//!   `validate_for_update` before any store call.
//! - `ItemStore` is the only seam to persistence; `MemoryStore` is the
//!   bundled implementation.
//! - Field newtypes make invalid items unrepresentable, so stores need no
//!   schema hooks of their own.

pub mod error;
pub mod id;
pub mod item;
pub mod memory;
pub mod store;
pub mod validation;

pub use error::{ItemError, ItemResult};
pub use id::ItemId;
pub use item::{Item, ItemName, ItemPatch, NewItem, Quantity};
pub use memory::MemoryStore;
pub use store::ItemStore;
pub use validation::{
    strip_done, validate_for_create, validate_for_update, FieldError, ValidationError,
};
