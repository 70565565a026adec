use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{OwnerId, RequestId},
    models::{AcceptOutcome, Direction, HistoryView, Occasion},
    routes::{
        extract::{AppJson, AppPath},
        AppState,
    },
    services::OutfitNavigator,
};

#[derive(Debug, Default, Deserialize)]
pub struct OccasionRequest {
    #[serde(default)]
    pub occasion: Option<Occasion>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: HistoryView,
}

/// Starts a browsing session with its first outfit.
///
/// The session is only registered once that first outfit exists, so an
/// insufficient wardrobe leaves nothing behind.
pub async fn start(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    OwnerId(owner_id): OwnerId,
    AppJson(request): AppJson<OccasionRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let mut navigator = OutfitNavigator::new(owner_id);
    let view = navigator
        .select_occasion(&state.recommender, request.occasion)
        .await?;
    let session_id = state.sessions.insert(navigator).await;

    tracing::info!(
        request_id = %request_id,
        owner_id = %owner_id,
        session_id = %session_id,
        occasion = ?request.occasion,
        "Session started"
    );

    Ok((StatusCode::CREATED, Json(SessionResponse { session_id, view })))
}

pub async fn current(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(session_id): AppPath<Uuid>,
) -> AppResult<Json<HistoryView>> {
    let session = state.sessions.get(owner_id, session_id).await?;
    let navigator = session.lock().await;
    Ok(Json(navigator.view()?))
}

/// Resets history and generates for the new occasion
pub async fn switch_occasion(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    OwnerId(owner_id): OwnerId,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<OccasionRequest>,
) -> AppResult<Json<HistoryView>> {
    let session = state.sessions.get(owner_id, session_id).await?;
    let mut navigator = session.lock().await;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        from = ?navigator.occasion(),
        to = ?request.occasion,
        "Switching session occasion"
    );

    let view = navigator
        .select_occasion(&state.recommender, request.occasion)
        .await?;
    Ok(Json(view))
}

pub async fn navigate(
    State(state): State<Arc<AppState>>,
    OwnerId(owner_id): OwnerId,
    AppPath(session_id): AppPath<Uuid>,
    AppJson(request): AppJson<NavigateRequest>,
) -> AppResult<Json<HistoryView>> {
    let session = state.sessions.get(owner_id, session_id).await?;
    let mut navigator = session.lock().await;
    let view = navigator
        .navigate(&state.recommender, request.direction)
        .await?;
    Ok(Json(view))
}

/// Logs wears for the current outfit and advances to a new one
pub async fn accept(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    OwnerId(owner_id): OwnerId,
    AppPath(session_id): AppPath<Uuid>,
) -> AppResult<Json<AcceptOutcome>> {
    let session = state.sessions.get(owner_id, session_id).await?;
    let mut navigator = session.lock().await;
    let outcome = navigator.accept_current(&state.recommender).await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        worn = outcome.worn.len(),
        failed = outcome.failed.len(),
        advanced = outcome.next.is_some(),
        "Accept handled"
    );

    Ok(Json(outcome))
}

/// Drops the session and its history
pub async fn end(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    OwnerId(owner_id): OwnerId,
    AppPath(session_id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    let session = state.sessions.get(owner_id, session_id).await?;
    session.lock().await.reset();
    state.sessions.remove(owner_id, session_id).await?;
    tracing::info!(request_id = %request_id, session_id = %session_id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}
