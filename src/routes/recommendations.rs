use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{OwnerId, RequestId},
    models::{Occasion, Outfit},
    routes::{extract::AppQuery, AppState},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub occasion: Option<Occasion>,
}

/// Generates a single outfit without recording it in any session
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    OwnerId(owner_id): OwnerId,
    AppQuery(query): AppQuery<RecommendationQuery>,
) -> AppResult<Json<Outfit>> {
    tracing::info!(
        request_id = %request_id,
        occasion = ?query.occasion,
        "Processing recommendation request"
    );

    let outfit = state.recommender.generate(owner_id, query.occasion).await?;
    Ok(Json(outfit))
}
