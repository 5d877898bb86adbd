//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Plaudit.
///
/// Only store failures ever leave the like engine as hard errors. Cache
/// failures are absorbed at the cache boundary, and an already-liked article is
/// a normal outcome that the HTTP boundary turns into [`Self::AlreadyLiked`].
#[derive(Error, Debug)]
pub enum PlauditError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness conflict reported by the durable store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller has already liked the article
    #[error("User has already liked article {article_id}")]
    AlreadyLiked { article_id: String },

    // ============ Boundary Errors ============
    /// No caller identity on a write request
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    // ============ Infrastructure Errors ============
    /// Durable store unreachable or the operation failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cache unreachable or the operation failed
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlauditError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::AlreadyLiked { .. } => 400,
            Self::AuthenticationRequired => 401,
            Self::Conflict(_) => 409,
            Self::RateLimitExceeded => 429,
            Self::StoreUnavailable(_)
            | Self::CacheUnavailable(_)
            | Self::Configuration(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::AlreadyLiked { .. } => "ALREADY_LIKED",
            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a store unavailable error.
    #[must_use]
    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a cache unavailable error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::CacheUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error comes from the durable store.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for PlauditError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::StoreUnavailable(err.to_string()),
        }
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `PlauditError`.
    ///
    /// Server-side failures are reported with a generic message so store and
    /// driver details stay in the logs.
    #[must_use]
    pub fn from_error(error: &PlauditError) -> Self {
        let message = match error {
            PlauditError::StoreUnavailable(_) => "Failed to access like counts".to_string(),
            e if e.status_code() >= 500 => "Internal server error".to_string(),
            e => e.to_string(),
        };

        Self {
            code: error.error_code().to_string(),
            message,
        }
    }
}

impl From<&PlauditError> for ErrorResponse {
    fn from(error: &PlauditError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(PlauditError::not_found("Article", "a1").status_code(), 404);
        assert_eq!(PlauditError::validation("blank id").status_code(), 400);
        assert_eq!(
            PlauditError::AlreadyLiked { article_id: "a1".to_string() }.status_code(),
            400
        );
        assert_eq!(PlauditError::AuthenticationRequired.status_code(), 401);
        assert_eq!(PlauditError::Conflict("dup".to_string()).status_code(), 409);
        assert_eq!(PlauditError::RateLimitExceeded.status_code(), 429);
        assert_eq!(PlauditError::store("down").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PlauditError::store("down").error_code(), "STORE_UNAVAILABLE");
        assert_eq!(PlauditError::cache("down").error_code(), "CACHE_UNAVAILABLE");
        assert_eq!(
            PlauditError::AlreadyLiked { article_id: "a1".to_string() }.error_code(),
            "ALREADY_LIKED"
        );
        assert_eq!(
            PlauditError::AuthenticationRequired.error_code(),
            "AUTHENTICATION_REQUIRED"
        );
        assert_eq!(PlauditError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_store_failure_detection() {
        assert!(PlauditError::store("connection refused").is_store_failure());
        assert!(!PlauditError::cache("connection refused").is_store_failure());
        assert!(!PlauditError::validation("bad").is_store_failure());
    }

    #[test]
    fn test_error_response_hides_store_details() {
        let err = PlauditError::store("mysql://user:secret@db refused");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "STORE_UNAVAILABLE");
        assert!(!response.message.contains("secret"));
    }

    #[test]
    fn test_error_response_keeps_client_messages() {
        let err = PlauditError::AlreadyLiked { article_id: "art1".to_string() };
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "ALREADY_LIKED");
        assert!(response.message.contains("art1"));
    }
}
