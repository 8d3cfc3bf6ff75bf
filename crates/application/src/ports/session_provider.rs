//! Session provider port
//!
//! The process-wide observable profile state: the last known snapshot per
//! authenticated user, a change notification channel, and an explicit
//! refresh operation that re-fetches after a mutation. Injected rather than
//! ambient so tests substitute a fake.

use async_trait::async_trait;
use domain::{entities::ProfileSnapshot, value_objects::UserId};
#[cfg(test)]
use mockall::automock;
use tokio::sync::watch;

use crate::error::ApplicationError;

/// Port for the shared session/profile state
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The last known snapshot for a user, if the session holds one
    fn current_snapshot(&self, user_id: &UserId) -> Option<ProfileSnapshot>;

    /// Watch for snapshot replacements for a user
    ///
    /// The receiver yields the full new snapshot on every publish; a new
    /// snapshot entirely replaces the old one.
    fn subscribe(&self, user_id: &UserId) -> watch::Receiver<Option<ProfileSnapshot>>;

    /// Re-fetch the profile from the backend and publish the new snapshot
    async fn refresh(&self, user_id: &UserId) -> Result<ProfileSnapshot, ApplicationError>;
}
