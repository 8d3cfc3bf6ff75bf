//! HTTP presentation layer for Visage
//!
//! Exposes the profile edit session and submit flow over an axum API,
//! guarded by a bearer-token session middleware.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{AuthenticatedUser, SessionGuardLayer};
pub use routes::create_router;
pub use state::{AppState, EditSessionRegistry};
