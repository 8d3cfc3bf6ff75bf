//! Integration tests for the persistence layer using in-memory SQLite
//!
//! These tests exercise the store and session provider together, the way
//! the running service uses them.

use std::sync::Arc;

use application::ports::{ProfileStore, SessionProvider};
use domain::{
    entities::{ChangeSet, EditDraft},
    value_objects::{AvatarRef, UserId},
};
use infrastructure::{
    DatabaseConfig, SqliteProfileStore, StoreBackedSessionProvider, create_pool,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_store() -> Arc<SqliteProfileStore> {
    let pool = create_pool(&DatabaseConfig {
        path: ":memory:".to_string(),
        max_connections: 1,
        run_migrations: true,
    })
    .unwrap();
    Arc::new(SqliteProfileStore::new(Arc::new(pool)))
}

fn changes(
    store_snapshot: &domain::entities::ProfileSnapshot,
    name: Option<&str>,
    uploaded: Option<&AvatarRef>,
) -> ChangeSet {
    let mut draft = EditDraft::seeded(store_snapshot.display_name_or_default(), None);
    if let Some(name) = name {
        draft.set_display_name(name);
    }
    ChangeSet::between(&draft, store_snapshot, uploaded)
}

// ============================================================================
// Profile Store Tests
// ============================================================================

mod profile_store_tests {
    use super::*;

    #[tokio::test]
    async fn partial_updates_accumulate() {
        let store = create_test_store();
        let user_id = UserId::new();
        store.ensure_exists(&user_id).await.unwrap();

        // Name first.
        let snapshot = store.get(&user_id).await.unwrap().unwrap();
        store
            .update(&user_id, &changes(&snapshot, Some("Ann"), None))
            .await
            .unwrap();

        // Avatar second, via a separate submit.
        let snapshot = store.get(&user_id).await.unwrap().unwrap();
        let uploaded = AvatarRef::new("u/123.png");
        store
            .update(&user_id, &changes(&snapshot, None, Some(&uploaded)))
            .await
            .unwrap();

        let final_snapshot = store.get(&user_id).await.unwrap().unwrap();
        assert_eq!(final_snapshot.display_name(), Some("Ann"));
        assert_eq!(
            final_snapshot.avatar_ref().map(AvatarRef::as_str),
            Some("u/123.png")
        );
    }

    #[tokio::test]
    async fn updated_at_moves_forward_on_writes() {
        let store = create_test_store();
        let user_id = UserId::new();
        store.ensure_exists(&user_id).await.unwrap();

        let before = store.get(&user_id).await.unwrap().unwrap();
        let after = store
            .update(&user_id, &changes(&before, Some("Ann"), None))
            .await
            .unwrap();

        assert!(after.updated_at() >= before.updated_at());
    }
}

// ============================================================================
// Session Provider Tests
// ============================================================================

mod session_provider_tests {
    use super::*;

    #[tokio::test]
    async fn refresh_after_update_reflects_the_write() {
        let store = create_test_store();
        let provider = StoreBackedSessionProvider::new(Arc::clone(&store) as Arc<dyn ProfileStore>);

        let user_id = UserId::new();
        store.ensure_exists(&user_id).await.unwrap();
        provider.refresh(&user_id).await.unwrap();

        let snapshot = provider.current_snapshot(&user_id).unwrap();
        store
            .update(&user_id, &changes(&snapshot, Some("Annie"), None))
            .await
            .unwrap();

        // Cached state is stale until the explicit refresh.
        assert!(
            provider
                .current_snapshot(&user_id)
                .unwrap()
                .display_name()
                .is_none()
        );

        provider.refresh(&user_id).await.unwrap();
        assert_eq!(
            provider.current_snapshot(&user_id).unwrap().display_name(),
            Some("Annie")
        );
    }

    #[tokio::test]
    async fn watchers_see_the_published_snapshot() {
        let store = create_test_store();
        let provider = StoreBackedSessionProvider::new(Arc::clone(&store) as Arc<dyn ProfileStore>);

        let user_id = UserId::new();
        store.ensure_exists(&user_id).await.unwrap();

        let mut receiver = provider.subscribe(&user_id);
        provider.refresh(&user_id).await.unwrap();

        receiver.changed().await.unwrap();
        assert!(receiver.borrow_and_update().is_some());
    }
}
