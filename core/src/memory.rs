//! In-process `ItemStore` backed by a locked map.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ItemError, ItemResult};
use crate::id::ItemId;
use crate::item::{Item, ItemPatch, NewItem};
use crate::store::ItemStore;

/// Items keyed by id. Listing follows id order, which is creation order
/// until the id counter wraps. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<BTreeMap<ItemId, Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_all(&self) -> ItemResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ItemId) -> ItemResult<Option<Item>> {
        let items = self.items.read().await;
        Ok(items.get(id).cloned())
    }

    async fn create(&self, new_item: NewItem) -> ItemResult<Item> {
        let item = new_item.into_item(ItemId::new());
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(ItemError::Unknown(format!("duplicate item id {}", item.id)));
        }
        items.insert(item.id, item.clone());
        debug!(id = %item.id, "item created");
        Ok(item)
    }

    async fn update_by_id(&self, id: &ItemId, patch: ItemPatch) -> ItemResult<Option<Item>> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(id) else {
            return Ok(None);
        };
        patch.apply_to(item);
        debug!(%id, "item updated");
        Ok(Some(item.clone()))
    }

    async fn delete_by_id(&self, id: &ItemId) -> ItemResult<bool> {
        let removed = self.items.write().await.remove(id).is_some();
        debug!(%id, removed, "item delete");
        Ok(removed)
    }
}
