//! Profile persistence port
//!
//! Defines the interface for reading and partially updating profile records.

use async_trait::async_trait;
use domain::{
    entities::{ChangeSet, ProfileSnapshot},
    value_objects::UserId,
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for profile persistence operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get the profile for a user, if one exists
    async fn get(&self, user_id: &UserId) -> Result<Option<ProfileSnapshot>, ApplicationError>;

    /// Persist the fields named in the change set, leaving all others untouched
    ///
    /// The write is atomic: either every named field lands or none does.
    /// Returns the updated snapshot.
    async fn update(
        &self,
        user_id: &UserId,
        changes: &ChangeSet,
    ) -> Result<ProfileSnapshot, ApplicationError>;
}
