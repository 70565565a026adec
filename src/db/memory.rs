use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{item_not_found, ItemStore};
use crate::{
    error::AppResult,
    models::{ItemDraft, Occasion, WardrobeItem},
};

/// In-process item store.
///
/// Each mutation runs inside a single write-lock section, which makes wear
/// increments atomic across concurrent sessions.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<Uuid, WardrobeItem>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully-formed item as-is, wear statistics included
    pub async fn insert(&self, item: WardrobeItem) {
        self.items.write().await.insert(item.id, item);
    }

    async fn mutate<F>(&self, owner_id: Uuid, item_id: Uuid, f: F) -> AppResult<WardrobeItem>
    where
        F: FnOnce(&mut WardrobeItem) + Send,
    {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&item_id)
            .filter(|item| item.owner_id == owner_id)
            .ok_or_else(|| item_not_found(item_id))?;
        f(item);
        Ok(item.clone())
    }
}

#[async_trait::async_trait]
impl ItemStore for MemoryItemStore {
    async fn list_items(&self, owner_id: Uuid, occasion: Option<Occasion>) -> AppResult<Vec<WardrobeItem>> {
        let items = self.items.read().await;
        let mut owned: Vec<WardrobeItem> = items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .filter(|item| occasion.is_none() || item.occasion == occasion)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        let items = self.items.read().await;
        items
            .get(&item_id)
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| item_not_found(item_id))
    }

    async fn create_item(&self, owner_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem> {
        let item = WardrobeItem::from_draft(owner_id, draft);
        self.insert(item.clone()).await;
        Ok(item)
    }

    async fn update_item(&self, owner_id: Uuid, item_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem> {
        self.mutate(owner_id, item_id, |item| item.apply(draft)).await
    }

    async fn delete_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let mut items = self.items.write().await;
        match items.get(&item_id) {
            Some(item) if item.owner_id == owner_id => {
                items.remove(&item_id);
                Ok(())
            }
            _ => Err(item_not_found(item_id)),
        }
    }

    async fn record_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        let today = Utc::now().date_naive();
        self.mutate(owner_id, item_id, |item| item.record_wear(today)).await
    }

    async fn undo_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem> {
        self.mutate(owner_id, item_id, WardrobeItem::undo_wear).await
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
