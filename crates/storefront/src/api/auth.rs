//! Authentication operations against the backend.

use reqwest::Method;
use tracing::instrument;

use super::types::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` with the server's message when the
    /// registration is rejected, or another classified error.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(
            self.request(Method::POST, "/auth/register", None)
                .json(request),
        )
        .await
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the credentials are rejected or the
    /// request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/auth/login", None).json(request))
            .await
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token is invalid or expired.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.send_json(self.request(Method::GET, "/auth/me", Some(token)))
            .await
    }

    /// Ask the backend whether the token's user has the admin role.
    ///
    /// The result is never cached; the admin gate performs one fresh check
    /// per use.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the check cannot be performed.
    #[instrument(skip(self, token))]
    pub async fn check_admin(&self, token: &str) -> Result<bool, ApiError> {
        self.send_json(self.request(Method::GET, "/auth/check-admin", Some(token)))
            .await
    }
}
