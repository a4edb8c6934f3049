use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use showcase_core::{AuthError, DatabaseError, MediaError, ShowcaseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid image source")]
    InvalidImageSource,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Showcase(#[from] ShowcaseError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidImageSource => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::Auth(AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Multipart(err) => err.status(),
            ApiError::Showcase(err) => match err {
                ShowcaseError::MissingField(_) => StatusCode::BAD_REQUEST,
                ShowcaseError::Media(MediaError::MissingImageSource) => StatusCode::BAD_REQUEST,
                ShowcaseError::Media(MediaError::ImageDecode(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ShowcaseError::Media(MediaError::Resize(_) | MediaError::Storage(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                ShowcaseError::Database(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
                ShowcaseError::Database(DatabaseError::AlreadySubscribed) => StatusCode::CONFLICT,
                ShowcaseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
