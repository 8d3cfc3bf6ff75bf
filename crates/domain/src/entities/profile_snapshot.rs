//! Profile snapshot entity
//!
//! The last known-good server state for a user's profile. A snapshot is
//! immutable once read; a refresh replaces it wholesale with a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AvatarRef, UserId};

/// Immutable server-side profile state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Unique user identifier
    id: UserId,
    /// Display name, unset for freshly created profiles
    display_name: Option<String>,
    /// Reference to the stored avatar image
    avatar_ref: Option<AvatarRef>,
    /// Role label assigned by the backend
    role: Option<String>,
    /// When the profile was last written
    updated_at: DateTime<Utc>,
}

impl ProfileSnapshot {
    /// Create an empty snapshot for a freshly provisioned user
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            avatar_ref: None,
            role: None,
            updated_at: Utc::now(),
        }
    }

    /// Restore a snapshot from storage
    #[must_use]
    pub const fn restore(
        id: UserId,
        display_name: Option<String>,
        avatar_ref: Option<AvatarRef>,
        role: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            display_name,
            avatar_ref,
            role,
            updated_at,
        }
    }

    /// Set the display name (builder style)
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the avatar reference (builder style)
    #[must_use]
    pub fn with_avatar_ref(mut self, avatar_ref: AvatarRef) -> Self {
        self.avatar_ref = Some(avatar_ref);
        self
    }

    /// Set the role label (builder style)
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Get the user ID
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Get the display name, if set
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The display name as the edit surface sees it: unset reads as empty
    #[must_use]
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    /// Get the avatar reference, if set
    #[must_use]
    pub const fn avatar_ref(&self) -> Option<&AvatarRef> {
        self.avatar_ref.as_ref()
    }

    /// Get the role label, if set
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Get the last write timestamp
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
