//! The persistence gateway for items.
//!
//! # Design
//! Handlers only see `dyn ItemStore`. Lookups that miss return `Ok(None)`
//! (or `Ok(false)` for deletes) so the caller decides how absence is
//! reported. Identifier syntax is settled before a store is called: every
//! method takes an already-parsed `ItemId`.

use async_trait::async_trait;

use crate::error::ItemResult;
use crate::id::ItemId;
use crate::item::{Item, ItemPatch, NewItem};

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, in an order chosen by the store.
    async fn find_all(&self) -> ItemResult<Vec<Item>>;

    async fn find_by_id(&self, id: &ItemId) -> ItemResult<Option<Item>>;

    /// Persist a new item under a freshly assigned id. The item starts not
    /// done.
    async fn create(&self, new_item: NewItem) -> ItemResult<Item>;

    /// Apply `patch` to the stored item and return the result, or `None` if
    /// no item has this id.
    async fn update_by_id(&self, id: &ItemId, patch: ItemPatch) -> ItemResult<Option<Item>>;

    /// Remove an item. Returns whether it existed.
    async fn delete_by_id(&self, id: &ItemId) -> ItemResult<bool>;
}
