//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use domain::value_objects::UserId;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: ServiceStatus,
}

/// Status of a backing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness check - is the server ready to accept requests?
///
/// Probes the profile store with a lookup for a user that cannot exist; a
/// clean miss proves the database is reachable.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.profile_store.get(&UserId::new()).await {
        Ok(_) => ServiceStatus {
            healthy: true,
            error: None,
        },
        Err(e) => ServiceStatus {
            healthy: false,
            error: Some(e.to_string()),
        },
    };

    let ready = database.healthy;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(ReadinessResponse { ready, database }))
}
