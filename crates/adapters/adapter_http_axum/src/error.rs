//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use turfbook_domain::error::{SlotUnavailableReason, TurfBookError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<SlotUnavailableReason>,
}

/// Maps [`TurfBookError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(TurfBookError);

impl From<TurfBookError> for ApiError {
    fn from(err: TurfBookError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut reason = None;
        let (status, message) = match &self.0 {
            TurfBookError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            TurfBookError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            TurfBookError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            TurfBookError::SlotUnavailable(err) => {
                reason = Some(*err);
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string())
            }
            TurfBookError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                reason,
            }),
        )
            .into_response()
    }
}
