use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snip_core::{ShortenerError, StorageError};
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(ShortenerError);

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        AppError(error)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            ShortenerError::InvalidUrl(_) | ShortenerError::InvalidShortCode(_) => {
                (StatusCode::BAD_REQUEST, "invalid_argument")
            }
            ShortenerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ShortenerError::CreationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "creation_failed")
            }
            ShortenerError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            }
            ShortenerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
