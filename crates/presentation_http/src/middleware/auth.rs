//! Session guard middleware
//!
//! Resolves the authenticated user from a bearer token in the Authorization
//! header. Tokens are opaque random strings configured per user; comparison
//! is constant-time. Unauthenticated requests are rejected before they reach
//! a handler, except for the probe endpoints.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    http::header::AUTHORIZATION,
    response::{IntoResponse, Response},
};
use domain::value_objects::UserId;
use infrastructure::config::AccessTokenEntry;
use subtle::ConstantTimeEq;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::error::ApiError;

/// The user a request is authenticated as, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Configured token entry with a parsed user ID
#[derive(Debug, Clone)]
struct VerifiedEntry {
    token: String,
    user_id: UserId,
}

/// Token store resolving bearer tokens to user IDs
#[derive(Debug, Clone, Default)]
struct TokenStore {
    entries: Vec<VerifiedEntry>,
}

impl TokenStore {
    /// Build from configured entries, skipping ones with unparseable user IDs
    fn from_entries(entries: &[AccessTokenEntry]) -> Self {
        let entries = entries
            .iter()
            .filter_map(|entry| match UserId::parse(&entry.user_id) {
                Ok(user_id) => Some(VerifiedEntry {
                    token: entry.token.clone(),
                    user_id,
                }),
                Err(e) => {
                    warn!(
                        user_id = %entry.user_id,
                        error = %e,
                        "Invalid user ID in access_tokens configuration, skipping entry"
                    );
                    None
                },
            })
            .collect();
        Self { entries }
    }

    /// Resolve a presented token, comparing constant-time against each entry
    fn verify(&self, presented: &str) -> Option<UserId> {
        let mut resolved = None;
        for entry in &self.entries {
            if entry.token.as_bytes().ct_eq(presented.as_bytes()).into() {
                resolved = Some(entry.user_id);
            }
        }
        resolved
    }
}

/// Layer applying the session guard
#[derive(Debug, Clone)]
pub struct SessionGuardLayer {
    store: Arc<TokenStore>,
    excluded_paths: Vec<String>,
}

impl SessionGuardLayer {
    /// Create a guard from configured access tokens
    ///
    /// `/health` and `/ready` stay reachable without a token.
    #[must_use]
    pub fn new(entries: &[AccessTokenEntry]) -> Self {
        Self {
            store: Arc::new(TokenStore::from_entries(entries)),
            excluded_paths: vec!["/health".to_string(), "/ready".to_string()],
        }
    }
}

impl<S> Layer<S> for SessionGuardLayer {
    type Service = SessionGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionGuard {
            inner,
            store: Arc::clone(&self.store),
            excluded_paths: self.excluded_paths.clone(),
        }
    }
}

/// Service enforcing the session guard
#[derive(Debug, Clone)]
pub struct SessionGuard<S> {
    inner: S,
    store: Arc<TokenStore>,
    excluded_paths: Vec<String>,
}

impl<S> Service<Request<Body>> for SessionGuard<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let path = request.uri().path().to_string();
        if self.excluded_paths.iter().any(|p| p == &path) {
            let future = self.inner.call(request);
            return Box::pin(future);
        }

        let presented = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let resolved = presented.and_then(|token| self.store.verify(token));

        match resolved {
            Some(user_id) => {
                debug!(user_id = %user_id, "Session guard admitted request");
                request.extensions_mut().insert(AuthenticatedUser(user_id));
                Box::pin(self.inner.call(request))
            },
            None => {
                debug!(path = %path, "Session guard rejected request");
                Box::pin(async move {
                    Ok(ApiError::Unauthorized("Authentication required".to_string())
                        .into_response())
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(token: &str, user_id: &UserId) -> AccessTokenEntry {
        AccessTokenEntry {
            token: token.to_string(),
            user_id: user_id.to_string(),
        }
    }

    #[test]
    fn verify_resolves_the_matching_user() {
        let first = UserId::new();
        let second = UserId::new();
        let store = TokenStore::from_entries(&[entry("alpha", &first), entry("beta", &second)]);

        assert_eq!(store.verify("alpha"), Some(first));
        assert_eq!(store.verify("beta"), Some(second));
    }

    #[test]
    fn verify_rejects_unknown_tokens() {
        let store = TokenStore::from_entries(&[entry("alpha", &UserId::new())]);
        assert_eq!(store.verify("alphax"), None);
        assert_eq!(store.verify(""), None);
    }

    #[test]
    fn invalid_user_ids_are_skipped() {
        let store = TokenStore::from_entries(&[AccessTokenEntry {
            token: "alpha".to_string(),
            user_id: "not-a-uuid".to_string(),
        }]);
        assert_eq!(store.verify("alpha"), None);
    }

    #[test]
    fn empty_store_rejects_everything() {
        let store = TokenStore::from_entries(&[]);
        assert_eq!(store.verify("anything"), None);
    }
}
