//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use studiobook_domain::StudiobookError;

/// Error returned by route handlers; wraps the domain error and decides
/// the HTTP status.
#[derive(Debug)]
pub struct ApiError(pub StudiobookError);

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl From<StudiobookError> for ApiError {
    fn from(err: StudiobookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            StudiobookError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            StudiobookError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            StudiobookError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "config"),
            StudiobookError::Network(_) | StudiobookError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, "upstream")
            }
            StudiobookError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = Json(ErrorBody { error: kind.to_string(), message: self.0.to_string() });
        (status, body).into_response()
    }
}

/// Result type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
