//! Security configuration for the session guard.

use serde::{Deserialize, Serialize};

/// One bearer token and the user it authenticates as
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenEntry {
    /// Opaque bearer token value
    pub token: String,
    /// User ID (UUID) the token resolves to
    pub user_id: String,
}

/// Security configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Configured access tokens
    ///
    /// An empty list disables the session guard; every request is rejected
    /// as unauthenticated except the probe endpoints.
    #[serde(default)]
    pub access_tokens: Vec<AccessTokenEntry>,
}
