use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wardrobe_api::{
    config::{Config, StorageBackend},
    create_router,
    db::{create_pool, ItemStore, MemoryItemStore, PgItemStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wardrobe_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn ItemStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.max_db_connections).await?;
            Arc::new(PgItemStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, wardrobe data will not survive a restart");
            Arc::new(MemoryItemStore::new())
        }
    };
    tracing::info!(store = store.name(), "Item store ready");

    let app = create_router(AppState::new(store, config.max_sessions));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
