use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::navigator::OutfitNavigator,
};

pub type SessionHandle = Arc<Mutex<OutfitNavigator>>;

struct SessionEntry {
    owner_id: Uuid,
    navigator: SessionHandle,
    last_used: DateTime<Utc>,
}

/// Browsing sessions, each owning one navigator.
///
/// Calls on the same session are serialized by the navigator's mutex. The
/// registry is bounded; inserting past capacity evicts the least recently used
/// session.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    capacity: usize,
}

impl SessionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Registers a navigator and returns its new session id
    pub async fn insert(&self, navigator: OutfitNavigator) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);
            match oldest {
                Some(evicted) => {
                    sessions.remove(&evicted);
                    tracing::debug!(session_id = %evicted, "Evicted idle session");
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            SessionEntry {
                owner_id: navigator.owner_id(),
                navigator: Arc::new(Mutex::new(navigator)),
                last_used: Utc::now(),
            },
        );
        id
    }

    /// Looks up a session owned by `owner_id`; anyone else gets `NotFound`
    pub async fn get(&self, owner_id: Uuid, session_id: Uuid) -> AppResult<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&session_id)
            .filter(|entry| entry.owner_id == owner_id)
            .ok_or_else(|| session_not_found(session_id))?;
        entry.last_used = Utc::now();
        Ok(entry.navigator.clone())
    }

    pub async fn remove(&self, owner_id: Uuid, session_id: Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&session_id) {
            Some(entry) if entry.owner_id == owner_id => {
                sessions.remove(&session_id);
                Ok(())
            }
            _ => Err(session_not_found(session_id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {}", session_id))
}
