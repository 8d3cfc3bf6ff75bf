//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let avatar_body_limit = state.config.server.max_body_size_avatar_bytes;

    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Diagnostics
        .route(
            "/v1/diagnostics/backend",
            get(handlers::diagnostics::backend_check),
        )
        // Profile API (v1)
        .route("/v1/profile", get(handlers::profile::get_profile))
        .route(
            "/v1/profile/draft",
            get(handlers::profile::get_draft).delete(handlers::profile::delete_draft),
        )
        .route(
            "/v1/profile/draft/name",
            put(handlers::profile::set_draft_name),
        )
        .route(
            "/v1/profile/draft/avatar",
            put(handlers::profile::stage_draft_avatar)
                .layer(DefaultBodyLimit::max(avatar_body_limit)),
        )
        .route("/v1/profile/submit", post(handlers::profile::submit_profile))
        // Attach state
        .with_state(state)
}
