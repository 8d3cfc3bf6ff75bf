//! Profile and edit-session handlers
//!
//! The edit flow mirrors the page it serves: read the profile, stage draft
//! edits (name, avatar file), then submit once. The submit handler holds the
//! session's exclusivity fence for the request duration, so a second submit
//! while one is in flight is rejected instead of queued.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use domain::{
    DomainError,
    entities::{ProfileSnapshot, UpdateOutcome},
    value_objects::{AvatarRef, UserId},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    error::ApiError,
    middleware::AuthenticatedUser,
    state::{AppState, EditSession},
};

/// Profile response body
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    fn from_snapshot(snapshot: &ProfileSnapshot, state: &AppState) -> Self {
        Self {
            id: snapshot.id(),
            display_name: snapshot.display_name().map(str::to_string),
            avatar_url: snapshot.avatar_ref().map(|r| resolve_url(state, r)),
            role: snapshot.role().map(str::to_string),
            updated_at: snapshot.updated_at(),
        }
    }
}

/// Draft state response body
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    /// Unsaved-changes indicator
    pub dirty: bool,
    /// Whether a file is staged for upload on the next submit
    pub has_pending_file: bool,
}

impl DraftResponse {
    fn from_session(session: &EditSession) -> Self {
        let draft = session.editor.draft();
        Self {
            display_name: draft.display_name().to_string(),
            preview_url: draft.preview_url().map(str::to_string),
            dirty: session.editor.is_dirty(),
            has_pending_file: draft.pending_file().is_some(),
        }
    }
}

/// Request body for setting the draft display name
#[derive(Debug, Deserialize, Validate)]
pub struct SetNameRequest {
    /// New display name
    #[validate(length(max = 120, message = "display name is limited to 120 characters"))]
    pub display_name: String,
}

fn resolve_url(state: &AppState, avatar_ref: &AvatarRef) -> String {
    if avatar_ref.is_absolute_url() {
        avatar_ref.as_str().to_string()
    } else {
        state.avatar_storage.public_url(avatar_ref)
    }
}

/// Current snapshot from the session, refreshing once when the session is cold
async fn current_snapshot(state: &AppState, user_id: &UserId) -> Result<ProfileSnapshot, ApiError> {
    if let Some(snapshot) = state.session.current_snapshot(user_id) {
        return Ok(snapshot);
    }
    state.session.refresh(user_id).await.map_err(ApiError::from)
}

/// The user's edit session, seeded from the current snapshot on first access
///
/// The snapshot is settled before the session subscribes to the snapshot
/// channel, so the initial refresh publish cannot race a first edit.
async fn edit_session(state: &AppState, user_id: UserId) -> Result<EditSession, ApiError> {
    if let Some(session) = state.edit_sessions.get(&user_id) {
        return Ok(session);
    }

    let snapshot = current_snapshot(state, &user_id).await?;
    let (session, created) = state
        .edit_sessions
        .get_or_create(user_id, &state.avatar_storage, &state.session);
    if created {
        session.editor.reseed(&snapshot);
    }
    Ok(session)
}

/// Get the authenticated user's profile
///
/// GET /v1/profile
#[instrument(skip(state), fields(user_id = %user.0))]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let snapshot = current_snapshot(&state, &user.0).await?;
    Ok(Json(ProfileResponse::from_snapshot(&snapshot, &state)))
}

/// Get the current draft state
///
/// GET /v1/profile/draft
#[instrument(skip(state), fields(user_id = %user.0))]
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DraftResponse>, ApiError> {
    let session = edit_session(&state, user.0).await?;
    Ok(Json(DraftResponse::from_session(&session)))
}

/// Set the draft display name
///
/// PUT /v1/profile/draft/name
#[instrument(skip(state, request), fields(user_id = %user.0))]
pub async fn set_draft_name(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<SetNameRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let session = edit_session(&state, user.0).await?;
    session.editor.set_display_name(request.display_name);
    Ok(Json(DraftResponse::from_session(&session)))
}

/// Stage an avatar file for upload on the next submit
///
/// PUT /v1/profile/draft/avatar
///
/// Raw image bytes in the body, MIME type in the Content-Type header. The
/// preview switches to the staged file immediately; nothing is uploaded
/// until the draft is submitted.
#[instrument(skip(state, headers, body), fields(user_id = %user.0, size = body.len()))]
pub async fn stage_draft_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: axum::http::HeaderMap,
    body: Bytes,
) -> Result<Json<DraftResponse>, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let session = edit_session(&state, user.0).await?;
    session
        .editor
        .set_pending_file(body, &content_type)
        .map_err(|e| match e {
            DomainError::FileTooLarge { .. } | DomainError::ValidationError(_) => {
                ApiError::BadRequest(e.to_string())
            },
            other => ApiError::Internal(other.to_string()),
        })?;

    Ok(Json(DraftResponse::from_session(&session)))
}

/// Submit the draft
///
/// POST /v1/profile/submit
///
/// Exactly one outcome per submit: `success`, `no_op`, `partial_failure`,
/// or `failure`, each as a tagged body the page renders directly.
#[instrument(skip(state), fields(user_id = %user.0))]
pub async fn submit_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, ApiError> {
    let session = edit_session(&state, user.0).await?;

    // Exclusivity fence: re-submission is disabled while one is in flight.
    let Ok(_fence) = session.submit_fence.try_lock() else {
        return Err(ApiError::Conflict("a submit is already in flight".to_string()));
    };

    let outcome = state.update_service.submit_for(&user.0, &session.editor).await;

    let status = match &outcome {
        UpdateOutcome::Failure { reason } => {
            warn!(reason = %reason, "Profile submit failed");
            StatusCode::INTERNAL_SERVER_ERROR
        },
        other => {
            info!(outcome = other.status_label(), "Profile submit finished");
            StatusCode::OK
        },
    };

    Ok((status, Json(outcome)))
}

/// Tear down the edit session
///
/// DELETE /v1/profile/draft
#[instrument(skip(state), fields(user_id = %user.0))]
pub async fn delete_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ApiError> {
    if state.edit_sessions.retire(&user.0) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("no edit session".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_name_request_accepts_reasonable_names() {
        let request = SetNameRequest {
            display_name: "Annie".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn set_name_request_rejects_overlong_names() {
        let request = SetNameRequest {
            display_name: "x".repeat(121),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_name_is_allowed() {
        // Clearing the display name is a legitimate edit.
        let request = SetNameRequest {
            display_name: String::new(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn profile_response_omits_unset_fields() {
        let resp = ProfileResponse {
            id: UserId::new(),
            display_name: None,
            avatar_url: None,
            role: None,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("display_name"));
        assert!(!json.contains("avatar_url"));
    }
}
