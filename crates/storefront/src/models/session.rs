//! Session-related types.
//!
//! The session is deliberately minimal: its only durable content is the
//! backend bearer token. Everything else the storefront renders is fetched
//! fresh from the backend per request.

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the backend bearer token.
    ///
    /// Lifecycle: written on login/register success, read on every
    /// authenticated request, removed on logout or when the session-expiry
    /// policy observes an authority failure.
    pub const API_TOKEN: &str = "api_token";
}
