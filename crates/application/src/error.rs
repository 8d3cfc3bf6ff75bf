//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Avatar upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Profile field persistence failed
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Post-update snapshot refresh failed
    #[error("Refresh failed: {0}")]
    Refresh(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is likely transient
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::Upload(_)
                | ApplicationError::Persistence(_)
                | ApplicationError::Refresh(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_pass_through_transparently() {
        let err = ApplicationError::from(DomainError::not_found("Profile", "42"));
        assert_eq!(err.to_string(), "Profile not found: 42");
    }

    #[test]
    fn upload_error_message() {
        let err = ApplicationError::Upload("bucket unreachable".to_string());
        assert_eq!(err.to_string(), "Upload failed: bucket unreachable");
    }

    #[test]
    fn external_call_errors_are_retryable() {
        assert!(ApplicationError::Upload("x".into()).is_retryable());
        assert!(ApplicationError::Persistence("x".into()).is_retryable());
        assert!(ApplicationError::Refresh("x".into()).is_retryable());
    }

    #[test]
    fn local_errors_are_not_retryable() {
        assert!(!ApplicationError::Configuration("x".into()).is_retryable());
        assert!(!ApplicationError::Internal("x".into()).is_retryable());
        assert!(
            !ApplicationError::from(DomainError::ValidationError("x".into())).is_retryable()
        );
    }
}
