use std::sync::Arc;

use crate::{
    db::ItemStore,
    services::{Recommender, SessionRegistry},
};

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub recommender: Recommender,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, max_sessions: usize) -> Self {
        Self {
            recommender: Recommender::new(store.clone()),
            store,
            sessions: SessionRegistry::new(max_sessions),
        }
    }
}
