//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding. Route handlers return `Result<T, AppError>`.
//!
//! An authority failure becomes a plain 401 response here; the
//! session-expiry policy middleware owns the reaction (clear session,
//! redirect to login).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::services::image::ImageError;

/// Generic message for failed image uploads. Decode and encode failures are
/// deliberately indistinguishable to the admin user.
pub const UPLOAD_ERROR_MESSAGE: &str = "The image could not be uploaded, please try another file";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Classified backend API failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Image preparation failed.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn is_server_class(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Api(
                    ApiError::Server | ApiError::Network(_) | ApiError::Decode(_) | ApiError::Unknown { .. }
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_class() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(err) => match err {
                ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
                ApiError::Forbidden => StatusCode::FORBIDDEN,
                ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::Server
                | ApiError::Network(_)
                | ApiError::Decode(_)
                | ApiError::Unknown { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::Image(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // User-facing messages only; internal detail stays in the logs
        let message = match &self {
            Self::Api(err) => err.to_string(),
            Self::Image(_) => UPLOAD_ERROR_MESSAGE.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
