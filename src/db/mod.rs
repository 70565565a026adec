//! Wardrobe item storage
//!
//! The recommender only sees storage through [`ItemStore`], so the Postgres
//! store used in production and the in-memory store used for tests and local
//! runs are interchangeable.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ItemDraft, Occasion, WardrobeItem},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryItemStore;
pub use postgres::{create_pool, PgItemStore};

/// Owner-scoped access to wardrobe items.
///
/// Every lookup is filtered by owner, so another user's item behaves exactly
/// like a missing one and yields `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// Lists the owner's items, newest first, optionally restricted to one occasion.
    ///
    /// Fails on any storage error rather than returning a partial list.
    async fn list_items(&self, owner_id: Uuid, occasion: Option<Occasion>) -> AppResult<Vec<WardrobeItem>>;

    async fn get_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem>;

    async fn create_item(&self, owner_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem>;

    /// Replaces the editable attributes of an item; wear statistics are kept.
    async fn update_item(&self, owner_id: Uuid, item_id: Uuid, draft: ItemDraft) -> AppResult<WardrobeItem>;

    async fn delete_item(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<()>;

    /// Atomically increments the wear count and stamps today as the last-worn date.
    async fn record_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem>;

    /// Decrements the wear count by one, never below zero.
    async fn undo_wear(&self, owner_id: Uuid, item_id: Uuid) -> AppResult<WardrobeItem>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

pub(crate) fn item_not_found(item_id: Uuid) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("Wardrobe item {}", item_id))
}
