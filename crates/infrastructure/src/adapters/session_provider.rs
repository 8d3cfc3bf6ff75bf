//! Store-backed session provider
//!
//! Implements the `SessionProvider` port as a process-wide observable
//! snapshot cache over the profile store: the last fetched snapshot per
//! user lives in an arc-swap cell, and every publish fans out through a
//! watch channel so observers see each replacement.

use std::{collections::HashMap, sync::Arc};

use application::{
    error::ApplicationError,
    ports::{ProfileStore, SessionProvider},
};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use domain::{entities::ProfileSnapshot, value_objects::UserId};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Cached state for one user's session
struct SessionEntry {
    snapshot: ArcSwapOption<ProfileSnapshot>,
    publisher: watch::Sender<Option<ProfileSnapshot>>,
}

impl SessionEntry {
    fn new() -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            snapshot: ArcSwapOption::const_empty(),
            publisher,
        }
    }

    fn publish(&self, snapshot: ProfileSnapshot) {
        self.snapshot.store(Some(Arc::new(snapshot.clone())));
        // send_replace never fails, even with no receivers
        self.publisher.send_replace(Some(snapshot));
    }
}

/// Session provider backed by the profile store
pub struct StoreBackedSessionProvider {
    profile_store: Arc<dyn ProfileStore>,
    sessions: RwLock<HashMap<UserId, Arc<SessionEntry>>>,
}

impl std::fmt::Debug for StoreBackedSessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBackedSessionProvider")
            .field("sessions", &self.sessions.read().len())
            .finish_non_exhaustive()
    }
}

impl StoreBackedSessionProvider {
    /// Create a provider over a profile store
    pub fn new(profile_store: Arc<dyn ProfileStore>) -> Self {
        Self {
            profile_store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, user_id: &UserId) -> Arc<SessionEntry> {
        if let Some(entry) = self.sessions.read().get(user_id) {
            return Arc::clone(entry);
        }
        let mut sessions = self.sessions.write();
        Arc::clone(
            sessions
                .entry(*user_id)
                .or_insert_with(|| Arc::new(SessionEntry::new())),
        )
    }
}

#[async_trait]
impl SessionProvider for StoreBackedSessionProvider {
    fn current_snapshot(&self, user_id: &UserId) -> Option<ProfileSnapshot> {
        self.sessions
            .read()
            .get(user_id)
            .and_then(|entry| entry.snapshot.load_full())
            .map(|snapshot| (*snapshot).clone())
    }

    fn subscribe(&self, user_id: &UserId) -> watch::Receiver<Option<ProfileSnapshot>> {
        self.entry(user_id).publisher.subscribe()
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn refresh(&self, user_id: &UserId) -> Result<ProfileSnapshot, ApplicationError> {
        let snapshot = self
            .profile_store
            .get(user_id)
            .await
            .map_err(|e| ApplicationError::Refresh(e.to_string()))?
            .ok_or_else(|| ApplicationError::NotFound(format!("profile {user_id}")))?;

        debug!("Publishing refreshed snapshot");
        self.entry(user_id).publish(snapshot.clone());
        Ok(snapshot)
    }
}
