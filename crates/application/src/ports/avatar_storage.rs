//! Avatar storage port
//!
//! Defines the interface for storing avatar image binaries and resolving
//! storage references to displayable URLs.

use async_trait::async_trait;
use bytes::Bytes;
use domain::value_objects::{AvatarRef, UserId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for avatar binary storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store an avatar image and return its storage reference
    async fn upload(
        &self,
        user_id: &UserId,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<AvatarRef, ApplicationError>;

    /// Resolve a storage reference to an absolute URL
    ///
    /// Pure lookup, assumed always resolvable for a valid reference.
    fn public_url(&self, avatar_ref: &AvatarRef) -> String;
}
