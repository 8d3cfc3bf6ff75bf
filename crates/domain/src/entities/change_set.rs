//! Change-set builder
//!
//! Computes the minimal diff between a draft and the snapshot it was seeded
//! from. Pure and deterministic: deciding whether a persistence call is
//! needed never touches the network.

use serde::{Deserialize, Serialize};

use crate::value_objects::AvatarRef;

use super::{EditDraft, ProfileSnapshot};

/// Minimal set of profile fields to persist
///
/// A field is present only when the draft value differs from the snapshot.
/// An empty change set with no staged file means there is nothing to persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_ref: Option<AvatarRef>,
}

impl ChangeSet {
    /// Diff a draft against its snapshot
    ///
    /// `uploaded_avatar` is the storage reference returned by an upload that
    /// happened during the current submission; a file that is merely staged
    /// never enters the change set.
    #[must_use]
    pub fn between(
        draft: &EditDraft,
        snapshot: &ProfileSnapshot,
        uploaded_avatar: Option<&AvatarRef>,
    ) -> Self {
        let display_name = (draft.display_name() != snapshot.display_name_or_default())
            .then(|| draft.display_name().to_string());

        Self {
            display_name,
            avatar_ref: uploaded_avatar.cloned(),
        }
    }

    /// Whether there is anything to persist
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.avatar_ref.is_none()
    }

    /// The display name to persist, if it changed
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The avatar reference to persist, if one was uploaded
    #[must_use]
    pub const fn avatar_ref(&self) -> Option<&AvatarRef> {
        self.avatar_ref.as_ref()
    }
}
