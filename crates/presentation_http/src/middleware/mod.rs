//! HTTP middleware components
//!
//! Session guard and request correlation for all API routes.

pub mod auth;
pub mod request_id;

pub use auth::{AuthenticatedUser, SessionGuard, SessionGuardLayer};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
