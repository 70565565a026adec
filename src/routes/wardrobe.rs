use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::OwnerId,
    models::{ItemDraft, ItemFilter, WardrobeItem},
    routes::{
        extract::{AppJson, AppPath, AppQuery},
        AppState,
    },
};

/// Lists the owner's items, newest first
pub async fn list(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppQuery(filter): AppQuery<ItemFilter>,
) -> AppResult<Json<Vec<WardrobeItem>>> {
    let items = state.store.list_items(owner_id, filter.occasion).await?;
    let items: Vec<WardrobeItem> = items.into_iter().filter(|i| filter.matches(i)).collect();
    Ok(Json(items))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppJson(draft): AppJson<ItemDraft>,
) -> AppResult<(StatusCode, Json<WardrobeItem>)> {
    let draft = draft.validate()?;
    let item = state.store.create_item(owner_id, draft).await?;

    tracing::info!(
        owner_id = %owner_id,
        item_id = %item.id,
        category = %item.category,
        "Wardrobe item added"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(item_id): AppPath<Uuid>,
) -> AppResult<Json<WardrobeItem>> {
    Ok(Json(state.store.get_item(owner_id, item_id).await?))
}

/// Replaces name, category, sub-category, color and occasion
pub async fn update(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(item_id): AppPath<Uuid>,
    AppJson(draft): AppJson<ItemDraft>,
) -> AppResult<Json<WardrobeItem>> {
    let draft = draft.validate()?;
    Ok(Json(state.store.update_item(owner_id, item_id, draft).await?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(item_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.store.delete_item(owner_id, item_id).await?;
    tracing::info!(owner_id = %owner_id, item_id = %item_id, "Wardrobe item deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn wear(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(item_id): AppPath<Uuid>,
) -> AppResult<Json<WardrobeItem>> {
    Ok(Json(state.store.record_wear(owner_id, item_id).await?))
}

pub async fn unwear(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(item_id): AppPath<Uuid>,
) -> AppResult<Json<WardrobeItem>> {
    Ok(Json(state.store.undo_wear(owner_id, item_id).await?))
}
