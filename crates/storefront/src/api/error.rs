//! Backend API error taxonomy.
//!
//! Failures are classified exactly once, centrally, by [`classify`]: a pure
//! mapping from HTTP status (plus the server-supplied message, if any) to an
//! [`ApiError`]. Handlers and service methods never re-classify; they either
//! propagate the error or render its `Display` message to the user.
//!
//! The *reaction* to an authority failure (clearing the session and
//! redirecting to the login page) is deliberately not performed here; it is
//! owned by the application layer. See `middleware::session_expiry_policy`.

use thiserror::Error;

/// Fixed user-facing messages for error kinds that never surface server text.
pub mod messages {
    pub const UNAUTHORIZED: &str = "Your session has expired, please sign in again";
    pub const FORBIDDEN: &str = "You do not have permission to perform this action";
    pub const SERVER_ERROR: &str = "A server error occurred, please try again later";
    pub const NETWORK_ERROR: &str = "Connection error, please check your network and try again";
    pub const DEFAULT: &str = "Something went wrong, please try again";
}

/// Classified failure of a backend API call.
///
/// The `Display` implementation is the user-facing message for the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Session invalid or expired (HTTP 401). The application layer reacts
    /// by clearing the session and redirecting to the login page.
    #[error("{}", messages::UNAUTHORIZED)]
    Unauthorized,

    /// Authenticated but insufficient privilege (HTTP 403).
    #[error("{}", messages::FORBIDDEN)]
    Forbidden,

    /// Validation failure (HTTP 400); carries the server-supplied message.
    #[error("{0}")]
    BadRequest(String),

    /// Generic backend failure (HTTP 500).
    #[error("{}", messages::SERVER_ERROR)]
    Server,

    /// No response was received. The underlying cause is kept for logs.
    #[error("{}", messages::NETWORK_ERROR)]
    Network(String),

    /// Any other status.
    #[error("{}", .message.as_deref().unwrap_or(messages::DEFAULT))]
    Unknown {
        status: u16,
        message: Option<String>,
    },

    /// The response body could not be decoded as the expected payload.
    #[error("The server returned an unexpected response")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Classify a non-success HTTP status into an [`ApiError`].
///
/// `server_message` is the `message` field of the backend's error body,
/// when one was present.
#[must_use]
pub fn classify(status: u16, server_message: Option<String>) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden,
        400 => ApiError::BadRequest(
            server_message.unwrap_or_else(|| messages::DEFAULT.to_string()),
        ),
        500 => ApiError::Server,
        _ => ApiError::Unknown {
            status,
            message: server_message,
        },
    }
}

/// Extract the `message` field from a backend error body, if the body is
/// a JSON object carrying one.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(String::from)
}
