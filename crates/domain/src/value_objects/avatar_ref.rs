//! Avatar reference value object
//!
//! An opaque storage reference such as `avatars/42/f3ab.png`, or an absolute
//! URL when the backend stored one directly. Callers that need a displayable
//! URL resolve non-absolute refs through the avatar storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a stored avatar image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarRef(String);

impl AvatarRef {
    /// Create a reference from a storage path or URL
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The raw reference string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference is already an absolute URL and needs no resolution
    #[must_use]
    pub fn is_absolute_url(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// Consume the reference, returning the inner string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AvatarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AvatarRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AvatarRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
