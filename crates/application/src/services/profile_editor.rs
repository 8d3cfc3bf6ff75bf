//! Profile editor - Local edit state for one edit session
//!
//! Holds the in-progress, not-yet-persisted form values seeded from the
//! last known server snapshot. The draft is discarded and re-seeded
//! whenever a new snapshot arrives: single-writer, last-snapshot-wins.
//!
//! An editor can be retired when its edit session is torn down; from then
//! on every state write becomes a no-op instead of an error, so an
//! orchestration that finishes mid-teardown has nowhere stale to write.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use bytes::Bytes;
use domain::{
    DomainError,
    entities::{EditDraft, ProfileSnapshot},
    value_objects::{AvatarRef, UserId},
};
use parking_lot::Mutex;
use tracing::debug;

use crate::ports::AvatarStorage;

/// Draft plus the snapshot it was seeded from, swapped together
struct EditorState {
    draft: EditDraft,
    baseline: Option<ProfileSnapshot>,
}

/// Local edit state for one user's profile edit session
pub struct ProfileEditor {
    user_id: UserId,
    avatar_storage: Arc<dyn AvatarStorage>,
    state: Mutex<EditorState>,
    live: AtomicBool,
}

impl fmt::Debug for ProfileEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileEditor")
            .field("user_id", &self.user_id)
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl ProfileEditor {
    /// Create an unseeded editor for a user
    pub fn new(user_id: UserId, avatar_storage: Arc<dyn AvatarStorage>) -> Self {
        Self {
            user_id,
            avatar_storage,
            state: Mutex::new(EditorState {
                draft: EditDraft::default(),
                baseline: None,
            }),
            live: AtomicBool::new(true),
        }
    }

    /// The user this editor belongs to
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Replace the draft with one derived from a newly arrived snapshot
    ///
    /// Any edits in progress are discarded. The preview becomes the
    /// snapshot's avatar reference resolved to a displayable URL; absolute
    /// URLs pass through unchanged. No-op once the editor is retired.
    pub fn reseed(&self, snapshot: &ProfileSnapshot) {
        if !self.is_live() {
            debug!(user_id = %self.user_id, "Editor retired, skipping reseed");
            return;
        }

        let preview = snapshot.avatar_ref().map(|r| self.resolve_preview(r));
        let mut state = self.state.lock();
        state.draft = EditDraft::seeded(snapshot.display_name_or_default(), preview);
        state.baseline = Some(snapshot.clone());
    }

    /// Store an in-progress display name
    pub fn set_display_name(&self, name: impl Into<String>) {
        self.state.lock().draft.set_display_name(name);
    }

    /// Stage a locally selected file for upload on the next submit
    ///
    /// Oversized files are rejected before any network call and leave the
    /// draft untouched.
    pub fn set_pending_file(
        &self,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), DomainError> {
        self.state.lock().draft.set_pending_file(bytes, content_type)
    }

    /// Clone of the current draft, taken by value at submit start
    #[must_use]
    pub fn draft(&self) -> EditDraft {
        self.state.lock().draft.clone()
    }

    /// The current preview URL, if any
    #[must_use]
    pub fn preview_url(&self) -> Option<String> {
        self.state.lock().draft.preview_url().map(str::to_string)
    }

    /// Whether the draft holds unsaved changes relative to its baseline
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let state = self.state.lock();
        let baseline_name = state
            .baseline
            .as_ref()
            .map_or("", ProfileSnapshot::display_name_or_default);
        state.draft.differs_from(baseline_name)
    }

    /// The snapshot the current draft was seeded from
    #[must_use]
    pub fn baseline(&self) -> Option<ProfileSnapshot> {
        self.state.lock().baseline.clone()
    }

    /// Tear down the edit session; all further state writes become no-ops
    pub fn retire(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Whether the edit session is still live
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn resolve_preview(&self, avatar_ref: &AvatarRef) -> String {
        if avatar_ref.is_absolute_url() {
            avatar_ref.as_str().to_string()
        } else {
            self.avatar_storage.public_url(avatar_ref)
        }
    }
}
