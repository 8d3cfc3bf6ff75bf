//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A staged file exceeds the upload size ceiling
    #[error("File too large: {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    FileTooLarge { size_bytes: usize, max_bytes: usize },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_message_names_both_sizes() {
        let err = DomainError::FileTooLarge {
            size_bytes: 6_000_000,
            max_bytes: 5_242_880,
        };
        let msg = err.to_string();
        assert!(msg.contains("6000000"));
        assert!(msg.contains("5242880"));
    }

    #[test]
    fn not_found_creates_correct_error() {
        let err = DomainError::not_found("Profile", "abc");
        match err {
            DomainError::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "Profile");
                assert_eq!(id, "abc");
            },
            _ => unreachable!("Expected NotFound error"),
        }
    }

    #[test]
    fn not_found_error_message_is_correct() {
        let err = DomainError::not_found("Profile", "abc");
        assert_eq!(err.to_string(), "Profile not found: abc");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("content type is required".to_string());
        assert_eq!(
            err.to_string(),
            "Validation failed: content type is required"
        );
    }
}
