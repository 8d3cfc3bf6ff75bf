//! Filesystem avatar storage adapter
//!
//! Implements the `AvatarStorage` port against a local directory. Stored
//! references have the shape `{user_id}/{file_id}.{ext}` relative to the
//! storage root; `public_url` joins them onto the configured base URL and
//! passes absolute URLs through unchanged.

use std::path::PathBuf;

use application::{error::ApplicationError, ports::AvatarStorage};
use async_trait::async_trait;
use bytes::Bytes;
use domain::value_objects::{AvatarRef, UserId};
use tokio::fs;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::StorageConfig;

/// Filesystem-backed avatar storage
#[derive(Debug, Clone)]
pub struct FsAvatarStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FsAvatarStorage {
    /// Create a storage adapter from configuration
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The directory avatars are written under
    #[must_use]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

/// File extension for a MIME type, defaulting to `bin` for unknown types
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

#[async_trait]
impl AvatarStorage for FsAvatarStorage {
    #[instrument(skip(self, bytes), fields(user_id = %user_id, size = bytes.len(), content_type = %content_type))]
    async fn upload(
        &self,
        user_id: &UserId,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<AvatarRef, ApplicationError> {
        let file_name = format!("{}.{}", Uuid::now_v7(), extension_for(content_type));
        let user_dir = self.root.join(user_id.to_string());

        fs::create_dir_all(&user_dir)
            .await
            .map_err(|e| ApplicationError::Upload(format!("creating avatar directory: {e}")))?;

        let path = user_dir.join(&file_name);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| ApplicationError::Upload(format!("writing avatar file: {e}")))?;

        debug!(path = %path.display(), "Stored avatar");
        Ok(AvatarRef::new(format!("{user_id}/{file_name}")))
    }

    fn public_url(&self, avatar_ref: &AvatarRef) -> String {
        if avatar_ref.is_absolute_url() {
            return avatar_ref.as_str().to_string();
        }
        format!("{}/{}", self.public_base_url, avatar_ref.as_str())
    }
}
