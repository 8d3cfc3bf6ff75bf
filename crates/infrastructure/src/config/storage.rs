//! Avatar storage configuration.

use serde::{Deserialize, Serialize};

/// Filesystem avatar storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory avatar binaries are written under
    #[serde(default = "default_root")]
    pub root: String,

    /// Base URL storage references are resolved against
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_root() -> String {
    "data/avatars".to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:3000/avatars".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: default_public_base_url(),
        }
    }
}
