//! Backend connectivity diagnostics
//!
//! A single blocking check an operator (or the settings page) can call to
//! see whether the profile backend is reachable for the authenticated user.

use std::time::Instant;

use axum::{Extension, Json, extract::State};
use domain::value_objects::AvatarRef;
use serde::Serialize;
use tracing::instrument;

use crate::{middleware::AuthenticatedUser, state::AppState};

/// Result of one backend probe
#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub healthy: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Backend diagnostics response
#[derive(Debug, Serialize)]
pub struct BackendDiagnostics {
    pub healthy: bool,
    pub database: ProbeResult,
    pub profile_found: bool,
    /// Where storage references currently resolve, as a sample URL
    pub storage_sample_url: String,
}

/// Check backend connectivity for the authenticated user
///
/// GET /v1/diagnostics/backend
#[instrument(skip(state), fields(user_id = %user.0))]
pub async fn backend_check(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<BackendDiagnostics> {
    let started = Instant::now();
    let lookup = state.profile_store.get(&user.0).await;
    #[allow(clippy::cast_possible_truncation)]
    let latency_ms = started.elapsed().as_millis() as u64;

    let (database, profile_found) = match lookup {
        Ok(profile) => (
            ProbeResult {
                healthy: true,
                latency_ms,
                error: None,
            },
            profile.is_some(),
        ),
        Err(e) => (
            ProbeResult {
                healthy: false,
                latency_ms,
                error: Some(e.to_string()),
            },
            false,
        ),
    };

    let storage_sample_url = state
        .avatar_storage
        .public_url(&AvatarRef::new("diagnostics/probe.png"));

    Json(BackendDiagnostics {
        healthy: database.healthy,
        database,
        profile_found,
        storage_sample_url,
    })
}
