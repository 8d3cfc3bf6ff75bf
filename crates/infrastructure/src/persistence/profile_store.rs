//! SQLite profile store implementation
//!
//! Implements the `ProfileStore` port using SQLite. Partial updates touch
//! only the columns named in the change set; the whole update runs in one
//! statement, so it is atomic per the port contract.

use std::sync::Arc;

use application::{error::ApplicationError, ports::ProfileStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    entities::{ChangeSet, ProfileSnapshot},
    value_objects::{AvatarRef, UserId},
};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based profile store
#[derive(Debug, Clone)]
pub struct SqliteProfileStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteProfileStore {
    /// Create a new SQLite profile store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Insert an empty profile row if the user has none yet
    ///
    /// Used at startup to provision profiles for configured users.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn ensure_exists(&self, user_id: &UserId) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user_id_str = user_id.to_string();
        let now = Utc::now().to_rfc3339();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO profiles (user_id, created_at, updated_at)
                     VALUES (?1, ?2, ?2)",
                    params![user_id_str, now],
                )
                .map_err(|e| ApplicationError::Persistence(e.to_string()))?;

            debug!(created = inserted > 0, "Ensured profile row");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Convert a database row to a `ProfileSnapshot`
fn row_to_snapshot(row: &Row<'_>) -> Result<ProfileSnapshot, rusqlite::Error> {
    let user_id_str: String = row.get(0)?;
    let display_name: Option<String> = row.get(1)?;
    let avatar_ref: Option<String> = row.get(2)?;
    let role: Option<String> = row.get(3)?;
    let updated_at_str: String = row.get(4)?;

    let user_id = UserId::parse(&user_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(ProfileSnapshot::restore(
        user_id,
        display_name,
        avatar_ref.map(AvatarRef::new),
        role,
        updated_at,
    ))
}

const SELECT_PROFILE: &str = "SELECT user_id, display_name, avatar_ref, role, updated_at
     FROM profiles WHERE user_id = ?1";

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get(&self, user_id: &UserId) -> Result<Option<ProfileSnapshot>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user_id_str = user_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let snapshot = conn
                .query_row(SELECT_PROFILE, [&user_id_str], row_to_snapshot)
                .optional()
                .map_err(|e| ApplicationError::Persistence(e.to_string()))?;

            debug!(found = snapshot.is_some(), "Retrieved profile");
            Ok(snapshot)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, changes), fields(user_id = %user_id))]
    async fn update(
        &self,
        user_id: &UserId,
        changes: &ChangeSet,
    ) -> Result<ProfileSnapshot, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let user_id_str = user_id.to_string();
        let display_name = changes.display_name().map(str::to_string);
        let avatar_ref = changes.avatar_ref().map(|r| r.as_str().to_string());
        let now = Utc::now().to_rfc3339();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut assignments = vec!["updated_at = :updated_at".to_string()];
            if display_name.is_some() {
                assignments.push("display_name = :display_name".to_string());
            }
            if avatar_ref.is_some() {
                assignments.push("avatar_ref = :avatar_ref".to_string());
            }

            let sql = format!(
                "UPDATE profiles SET {} WHERE user_id = :user_id",
                assignments.join(", ")
            );

            let mut named: Vec<(&str, &dyn rusqlite::ToSql)> = vec![
                (":updated_at", &now),
                (":user_id", &user_id_str),
            ];
            if let Some(name) = display_name.as_ref() {
                named.push((":display_name", name));
            }
            if let Some(avatar) = avatar_ref.as_ref() {
                named.push((":avatar_ref", avatar));
            }

            let updated = conn
                .execute(&sql, named.as_slice())
                .map_err(|e| ApplicationError::Persistence(e.to_string()))?;

            if updated == 0 {
                return Err(ApplicationError::NotFound(format!(
                    "profile {user_id_str}"
                )));
            }

            let snapshot = conn
                .query_row(SELECT_PROFILE, [&user_id_str], row_to_snapshot)
                .map_err(|e| ApplicationError::Persistence(e.to_string()))?;

            debug!("Updated profile");
            Ok(snapshot)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}
