//! API response types.

use plaudit_core::{ErrorResponse, PlauditError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

/// Error code of a failed response, attached as a response extension so
/// middleware can log the outcome without parsing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub PlauditError);

impl From<PlauditError> for AppError {
    fn from(err: PlauditError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        let mut response = (status, Json(ErrorResponse::from_error(&self.0))).into_response();
        response
            .extensions_mut()
            .insert(ErrorCode(self.0.error_code()));
        response
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Helper to create a success response.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}
