//! Application state shared across handlers

use std::{collections::HashMap, sync::Arc};

use application::{
    ProfileEditor, ProfileUpdateService,
    ports::{AvatarStorage, ProfileStore, SessionProvider},
};
use domain::value_objects::UserId;
use infrastructure::AppConfig;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::debug;

/// One user's edit session: the editor plus the submit fence
///
/// The orchestrator does not guard re-entrancy itself; the fence lives here
/// at the boundary, held for the duration of one submit request.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Local edit state
    pub editor: Arc<ProfileEditor>,
    /// Exclusivity fence disabling re-submission while one is in flight
    pub submit_fence: Arc<Mutex<()>>,
}

/// Per-user edit session registry
#[derive(Default)]
pub struct EditSessionRegistry {
    sessions: RwLock<HashMap<UserId, EditSession>>,
}

impl std::fmt::Debug for EditSessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSessionRegistry")
            .field("sessions", &self.sessions.read().len())
            .finish()
    }
}

impl EditSessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the user's edit session, creating an unseeded one on first access
    ///
    /// Returns `(session, created)`; a freshly created session still needs
    /// seeding from the current snapshot. New sessions follow the session
    /// provider's snapshot channel: every published snapshot replaces the
    /// draft, last-snapshot-wins, until the editor retires.
    pub fn get_or_create(
        &self,
        user_id: UserId,
        avatar_storage: &Arc<dyn AvatarStorage>,
        session_provider: &Arc<dyn SessionProvider>,
    ) -> (EditSession, bool) {
        if let Some(session) = self.sessions.read().get(&user_id) {
            return (session.clone(), false);
        }

        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get(&user_id) {
            return (session.clone(), false);
        }

        let session = EditSession {
            editor: Arc::new(ProfileEditor::new(user_id, Arc::clone(avatar_storage))),
            submit_fence: Arc::new(Mutex::new(())),
        };
        sessions.insert(user_id, session.clone());
        spawn_reseed_listener(Arc::clone(&session.editor), session_provider);
        (session, true)
    }

    /// Look up the user's edit session without creating one
    #[must_use]
    pub fn get(&self, user_id: &UserId) -> Option<EditSession> {
        self.sessions.read().get(user_id).cloned()
    }

    /// Tear down the user's edit session
    ///
    /// The removed editor is retired so any submit still in flight has
    /// nowhere stale to write.
    pub fn retire(&self, user_id: &UserId) -> bool {
        let removed = self.sessions.write().remove(user_id);
        match removed {
            Some(session) => {
                session.editor.retire();
                true
            },
            None => false,
        }
    }
}

/// Follow the snapshot channel for one editor, reseeding on every publish
///
/// Exits once the editor retires; the reseed itself is also guarded by the
/// editor's liveness flag, so a publish racing a teardown is a no-op.
fn spawn_reseed_listener(editor: Arc<ProfileEditor>, session_provider: &Arc<dyn SessionProvider>) {
    let mut receiver = session_provider.subscribe(&editor.user_id());
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            if !editor.is_live() {
                break;
            }
            let snapshot = receiver.borrow_and_update().clone();
            if let Some(snapshot) = snapshot {
                debug!(user_id = %editor.user_id(), "Snapshot arrived, reseeding draft");
                editor.reseed(&snapshot);
            }
        }
    });
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Orchestrator for profile submits
    pub update_service: Arc<ProfileUpdateService>,
    /// Shared session/profile snapshot state
    pub session: Arc<dyn SessionProvider>,
    /// Avatar binary storage
    pub avatar_storage: Arc<dyn AvatarStorage>,
    /// Profile persistence, used by probes
    pub profile_store: Arc<dyn ProfileStore>,
    /// Per-user edit sessions
    pub edit_sessions: Arc<EditSessionRegistry>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("edit_sessions", &self.edit_sessions)
            .finish_non_exhaustive()
    }
}
