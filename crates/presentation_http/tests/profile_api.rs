//! End-to-end API tests over the full stack: real router, session guard,
//! in-memory SQLite store, and tempdir avatar storage.

use std::sync::Arc;

use application::{
    ProfileUpdateService,
    ports::{AvatarStorage, ProfileStore, SessionProvider},
};
use axum::Router;
use axum_test::TestServer;
use domain::value_objects::UserId;
use infrastructure::{
    AccessTokenEntry, AppConfig, DatabaseConfig, Environment, FsAvatarStorage, SecurityConfig,
    ServerConfig, SqliteProfileStore, StorageConfig, StoreBackedSessionProvider, create_pool,
};
use presentation_http::{AppState, EditSessionRegistry, SessionGuardLayer, create_router};
use serde_json::{Value, json};

const TOKEN: &str = "test-token";

struct TestApp {
    server: TestServer,
    user_id: UserId,
    // Held so the avatar directory outlives the test
    _storage_dir: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let storage_dir = tempfile::tempdir().unwrap();
    let user_id = UserId::new();

    let config = AppConfig {
        environment: Environment::Development,
        server: ServerConfig::default(),
        database: DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        },
        storage: StorageConfig {
            root: storage_dir.path().to_string_lossy().into_owned(),
            public_base_url: "https://cdn.test/avatars".to_string(),
        },
        security: SecurityConfig {
            access_tokens: vec![AccessTokenEntry {
                token: TOKEN.to_string(),
                user_id: user_id.to_string(),
            }],
        },
    };

    let pool = create_pool(&config.database).unwrap();
    let profile_store = Arc::new(SqliteProfileStore::new(Arc::new(pool)));
    profile_store.ensure_exists(&user_id).await.unwrap();

    let avatar_storage: Arc<dyn AvatarStorage> = Arc::new(FsAvatarStorage::new(&config.storage));
    let store: Arc<dyn ProfileStore> = Arc::clone(&profile_store) as Arc<dyn ProfileStore>;
    let session: Arc<dyn SessionProvider> =
        Arc::new(StoreBackedSessionProvider::new(Arc::clone(&store)));

    let update_service = Arc::new(ProfileUpdateService::new(
        Arc::clone(&store),
        Arc::clone(&avatar_storage),
        Arc::clone(&session),
    ));

    let guard = SessionGuardLayer::new(&config.security.access_tokens);

    let state = AppState {
        update_service,
        session,
        avatar_storage,
        profile_store: store,
        edit_sessions: Arc::new(EditSessionRegistry::new()),
        config: Arc::new(config),
    };

    let app: Router = create_router(state).layer(guard);

    TestApp {
        server: TestServer::new(app).unwrap(),
        user_id,
        _storage_dir: storage_dir,
    }
}

#[tokio::test]
async fn probes_are_reachable_without_a_token() {
    let app = spawn_app().await;

    let health = app.server.get("/health").await;
    health.assert_status_ok();

    let ready = app.server.get("/ready").await;
    ready.assert_status_ok();
    assert_eq!(ready.json::<Value>()["ready"], json!(true));
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let app = spawn_app().await;

    let response = app.server.get("/v1/profile").await;
    response.assert_status_unauthorized();

    let wrong = app
        .server
        .get("/v1/profile")
        .authorization_bearer("wrong-token")
        .await;
    wrong.assert_status_unauthorized();
}

#[tokio::test]
async fn fresh_profile_has_no_name_or_avatar() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/v1/profile")
        .authorization_bearer(TOKEN)
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["id"], json!(app.user_id.to_string()));
    assert!(body.get("display_name").is_none());
    assert!(body.get("avatar_url").is_none());
}

#[tokio::test]
async fn name_edit_round_trip() {
    let app = spawn_app().await;

    // Stage the edit.
    let draft = app
        .server
        .put("/v1/profile/draft/name")
        .authorization_bearer(TOKEN)
        .json(&json!({ "display_name": "Annie" }))
        .await;
    draft.assert_status_ok();
    let body = draft.json::<Value>();
    assert_eq!(body["display_name"], json!("Annie"));
    assert_eq!(body["dirty"], json!(true));

    // Submit it.
    let submit = app
        .server
        .post("/v1/profile/submit")
        .authorization_bearer(TOKEN)
        .await;
    submit.assert_status_ok();
    let outcome = submit.json::<Value>();
    assert_eq!(outcome["status"], json!("success"));
    assert!(outcome.get("warnings").is_none());

    // The profile now carries the new name and the draft is clean.
    let profile = app
        .server
        .get("/v1/profile")
        .authorization_bearer(TOKEN)
        .await;
    assert_eq!(profile.json::<Value>()["display_name"], json!("Annie"));

    let draft = app
        .server
        .get("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await;
    assert_eq!(draft.json::<Value>()["dirty"], json!(false));
}

#[tokio::test]
async fn submitting_an_unchanged_draft_is_a_noop() {
    let app = spawn_app().await;

    // Touch the draft so the edit session exists, without changing anything.
    app.server
        .get("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await
        .assert_status_ok();

    let submit = app
        .server
        .post("/v1/profile/submit")
        .authorization_bearer(TOKEN)
        .await;
    submit.assert_status_ok();
    assert_eq!(submit.json::<Value>()["status"], json!("no_op"));
}

#[tokio::test]
async fn avatar_upload_round_trip() {
    let app = spawn_app().await;

    // Stage a small image.
    let staged = app
        .server
        .put("/v1/profile/draft/avatar")
        .authorization_bearer(TOKEN)
        .content_type("image/png")
        .bytes(vec![7u8; 2048].into())
        .await;
    staged.assert_status_ok();
    let body = staged.json::<Value>();
    assert_eq!(body["has_pending_file"], json!(true));
    assert_eq!(body["preview_url"], json!("pending:image/png;2048"));

    // Submit; the upload happens now.
    let submit = app
        .server
        .post("/v1/profile/submit")
        .authorization_bearer(TOKEN)
        .await;
    submit.assert_status_ok();
    let outcome = submit.json::<Value>();
    assert_eq!(outcome["status"], json!("success"));

    // Profile resolves to the public URL and the draft preview matches.
    let profile = app
        .server
        .get("/v1/profile")
        .authorization_bearer(TOKEN)
        .await;
    let avatar_url = profile.json::<Value>()["avatar_url"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(avatar_url.starts_with("https://cdn.test/avatars/"));

    let draft = app
        .server
        .get("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await;
    let body = draft.json::<Value>();
    assert_eq!(body["preview_url"], json!(avatar_url));
    assert_eq!(body["has_pending_file"], json!(false));
}

#[tokio::test]
async fn oversized_avatar_is_rejected_locally() {
    let app = spawn_app().await;

    let staged = app
        .server
        .put("/v1/profile/draft/avatar")
        .authorization_bearer(TOKEN)
        .content_type("image/png")
        .bytes(vec![0u8; 5 * 1024 * 1024 + 1].into())
        .await;
    staged.assert_status_bad_request();

    // Nothing staged, so the next submit has nothing to do.
    let submit = app
        .server
        .post("/v1/profile/submit")
        .authorization_bearer(TOKEN)
        .await;
    assert_eq!(submit.json::<Value>()["status"], json!("no_op"));
}

#[tokio::test]
async fn draft_teardown_round_trip() {
    let app = spawn_app().await;

    app.server
        .get("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await
        .assert_status_ok();

    let deleted = app
        .server
        .delete("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await;
    deleted.assert_status(axum::http::StatusCode::NO_CONTENT);

    let again = app
        .server
        .delete("/v1/profile/draft")
        .authorization_bearer(TOKEN)
        .await;
    again.assert_status_not_found();
}

#[tokio::test]
async fn diagnostics_report_a_healthy_backend() {
    let app = spawn_app().await;

    let response = app
        .server
        .get("/v1/diagnostics/backend")
        .authorization_bearer(TOKEN)
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["healthy"], json!(true));
    assert_eq!(body["profile_found"], json!(true));
    assert!(
        body["storage_sample_url"]
            .as_str()
            .unwrap()
            .starts_with("https://cdn.test/avatars/")
    );
}
