//! Profile update service - Orchestrates one profile submit
//!
//! Sequences the optional avatar upload, the optional partial field update,
//! the post-update snapshot refresh, and the preview rewrite into one
//! atomic-looking operation, publishing exactly one outcome per submit:
//! 1. Upload the staged file, if any (failure degrades, never aborts)
//! 2. Diff the draft against the snapshot
//! 3. Short-circuit when there is nothing to persist
//! 4. Persist the change set (failure here is fatal for the submit)
//! 5. Refresh the shared snapshot (best effort)
//! 6. Reconcile the editor's preview and staged file

use std::{fmt, sync::Arc};

use domain::{
    entities::{ChangeSet, EditDraft, ProfileSnapshot, UpdateOutcome},
    value_objects::{AvatarRef, UserId},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    ports::{AvatarStorage, ProfileStore, SessionProvider},
    services::ProfileEditor,
};

/// Service orchestrating profile submits
pub struct ProfileUpdateService {
    profile_store: Arc<dyn ProfileStore>,
    avatar_storage: Arc<dyn AvatarStorage>,
    session: Arc<dyn SessionProvider>,
}

impl fmt::Debug for ProfileUpdateService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdateService").finish_non_exhaustive()
    }
}

impl ProfileUpdateService {
    /// Create a new profile update service
    pub fn new(
        profile_store: Arc<dyn ProfileStore>,
        avatar_storage: Arc<dyn AvatarStorage>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            profile_store,
            avatar_storage,
            session,
        }
    }

    /// Run one submit for a draft taken by value
    ///
    /// Single-flight per call: the caller disables re-submission while an
    /// invocation is outstanding. Steps run strictly in sequence; no two
    /// backend calls from one submit overlap.
    #[instrument(skip(self, draft, snapshot), fields(
        user_id = %user_id,
        has_pending_file = draft.pending_file().is_some(),
    ))]
    pub async fn submit(
        &self,
        user_id: &UserId,
        draft: EditDraft,
        snapshot: &ProfileSnapshot,
    ) -> UpdateOutcome {
        let mut warnings = Vec::new();

        // Step 1: upload the staged file. An upload failure must not block
        // a legitimate name edit, so the flow continues without a new
        // avatar reference.
        let mut upload_failed = false;
        let uploaded: Option<AvatarRef> = match draft.pending_file() {
            Some(file) => {
                match self
                    .avatar_storage
                    .upload(user_id, file.bytes().clone(), file.content_type())
                    .await
                {
                    Ok(stored) => {
                        debug!(avatar_ref = %stored, "Avatar uploaded");
                        Some(stored)
                    },
                    Err(e) => {
                        warn!(error = %e, "Avatar upload failed, continuing with remaining changes");
                        upload_failed = true;
                        warnings.push(format!("avatar upload failed: {e}"));
                        None
                    },
                }
            },
            None => None,
        };

        // Step 2: minimal diff against the snapshot.
        let changes = ChangeSet::between(&draft, snapshot, uploaded.as_ref());

        // Step 3: nothing to persist. An empty change set after a failed
        // upload is a partial failure, not a no-op.
        if changes.is_empty() {
            if upload_failed {
                return UpdateOutcome::PartialFailure {
                    reason: "avatar upload failed, no other changes".to_string(),
                };
            }
            debug!("Nothing to persist, skipping backend write");
            return UpdateOutcome::NoOp;
        }

        // Step 4: persist. The store is trusted to apply the change set
        // atomically; a failure here fails the submit.
        let persisted = match self.profile_store.update(user_id, &changes).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Profile update failed");
                return UpdateOutcome::Failure {
                    reason: e.to_string(),
                };
            },
        };

        // Step 5: refresh the shared snapshot. Best effort: the write
        // already landed, so a refresh failure downgrades to a warning and
        // the persist result stands in for the refreshed snapshot.
        let current = match self.session.refresh(user_id).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!(error = %e, "Snapshot refresh failed after successful update");
                warnings.push(format!("profile refresh failed: {e}"));
                persisted
            },
        };

        info!(warnings = warnings.len(), "Profile submit persisted");
        UpdateOutcome::Success {
            snapshot: current,
            warnings,
        }
    }

    /// Run one submit for an edit session, reconciling the editor afterwards
    ///
    /// Takes the draft by value so a reseed mid-flight cannot tear it, reads
    /// the current snapshot from the session, and on success replaces the
    /// draft with one derived from the updated snapshot: the transient local
    /// preview becomes the resolved public URL and the staged file is
    /// cleared, so re-submitting without a new selection does not re-upload.
    /// The write-back is a no-op when the editor was retired mid-flight.
    #[instrument(skip(self, editor), fields(user_id = %user_id))]
    pub async fn submit_for(&self, user_id: &UserId, editor: &ProfileEditor) -> UpdateOutcome {
        let Some(snapshot) = self.session.current_snapshot(user_id) else {
            return UpdateOutcome::Failure {
                reason: "no profile snapshot for user".to_string(),
            };
        };

        let draft = editor.draft();
        let outcome = self.submit(user_id, draft, &snapshot).await;

        if let UpdateOutcome::Success { snapshot, .. } = &outcome {
            editor.reseed(snapshot);
        }

        outcome
    }
}
