//! Caller identity extractor.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use plaudit_core::{PlauditError, UserId};

/// Header carrying the identity of the caller.
pub const USER_ID_HEADER: &str = "user-id";

/// Identity of the user making a write request.
///
/// Rejects with `401 AUTHENTICATION_REQUIRED` when the `user-id` header is
/// missing or blank, and with `400` when it is not a valid identifier.
#[derive(Debug, Clone)]
pub struct Caller(pub UserId);

impl std::ops::Deref for Caller {
    type Target = UserId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Err(AppError(PlauditError::AuthenticationRequired));
        };

        let raw = value
            .to_str()
            .map_err(|_| PlauditError::validation("user-id header must be valid UTF-8"))?;

        if raw.trim().is_empty() {
            return Err(AppError(PlauditError::AuthenticationRequired));
        }

        Ok(Caller(UserId::parse(raw)?))
    }
}
