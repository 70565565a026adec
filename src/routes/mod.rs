use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};
pub use crate::state::AppState;

pub mod extract;
pub mod recommendations;
pub mod sessions;
pub mod wardrobe;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Wardrobe items
        .route("/wardrobe", get(wardrobe::list).post(wardrobe::create))
        .route(
            "/wardrobe/:id",
            get(wardrobe::get_one).put(wardrobe::update).delete(wardrobe::remove),
        )
        .route("/wardrobe/:id/wear", post(wardrobe::wear))
        .route("/wardrobe/:id/unwear", post(wardrobe::unwear))
        // One-shot recommendation
        .route("/recommendations", get(recommendations::recommend))
        // Browsing sessions
        .route("/sessions", post(sessions::start))
        .route("/sessions/:id", get(sessions::current).delete(sessions::end))
        .route("/sessions/:id/occasion", put(sessions::switch_occasion))
        .route("/sessions/:id/navigate", post(sessions::navigate))
        .route("/sessions/:id/accept", post(sessions::accept))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
