use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkmint_shortener::AllocatorError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub enum AppError {
    Allocation(AllocatorError),
    NotFound(String),
    /// The request could not be extracted. Keeps the extractor's status.
    Rejected(StatusCode, String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<AllocatorError> for AppError {
    fn from(value: AllocatorError) -> Self {
        Self::Allocation(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Allocation(AllocatorError::InvalidArgument(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Allocation(err @ AllocatorError::CodeSpaceExhausted { .. }) => {
                error!(error = %err, "short code space exhausted");
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            AppError::Allocation(AllocatorError::Storage(err)) => {
                error!(error = %err, "link store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "link store unavailable".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Rejected(status, message) => (status, message),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
