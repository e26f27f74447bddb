//! Authentication gates and session token helpers.
//!
//! Two extractors gate pages, mirroring the two kinds of protected screens:
//!
//! - [`RequireAuth`]: the page renders iff a bearer token is present in the
//!   session; otherwise the visitor is redirected to the login page.
//! - [`RequireAdmin`]: with no token, redirect to the login page
//!   immediately; with a token, perform one uncached `GET /auth/check-admin`
//!   call. A truthy response allows the page; a falsy response or *any*
//!   error redirects to the home page. A single failed check is terminal
//!   for that request; there is no retry.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::session_keys;
use crate::state::AppState;

/// Header sent by HTMX with every request it issues.
const HTMX_REQUEST_HEADER: &str = "hx-request";

/// Build a redirect that works for both full-page and HTMX requests.
///
/// HTMX swaps a redirect's body into the target fragment, so fragment
/// requests get an `HX-Redirect` header (full navigation, client side)
/// instead of a 3xx response.
pub(crate) fn redirect_for(htmx: bool, location: &'static str) -> Response {
    if htmx {
        (AppendHeaders([("HX-Redirect", location)]), "").into_response()
    } else {
        Redirect::to(location).into_response()
    }
}

fn is_htmx(parts: &Parts) -> bool {
    parts.headers.contains_key(HTMX_REQUEST_HEADER)
}

// =============================================================================
// Session token helpers
// =============================================================================

/// Read the backend bearer token from the session.
pub async fn api_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::API_TOKEN)
        .await
        .ok()
        .flatten()
}

/// Store the backend bearer token in the session (login/register success).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_api_token(
    session: &Session,
    token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::API_TOKEN, token).await
}

/// Remove the backend bearer token from the session (logout, or authority
/// failure observed by the session-expiry policy).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_api_token(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(session_keys::API_TOKEN).await?;
    Ok(())
}

/// Whether a visitor is authenticated: true iff a token is stored.
pub async fn is_authenticated(session: &Session) -> bool {
    api_token(session).await.is_some()
}

// =============================================================================
// RequireAuth
// =============================================================================

/// Extractor that requires a logged-in session.
///
/// Carries the bearer token for the handler's backend calls.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(token): RequireAuth,
/// ) -> impl IntoResponse {
///     // token is attached to backend calls by the ApiClient
/// }
/// ```
pub struct RequireAuth(pub String);

/// Rejection for [`RequireAuth`]: redirect to the login page.
pub struct AuthRejection {
    htmx: bool,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        redirect_for(self.htmx, "/login")
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let htmx = is_htmx(parts);

        // The session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection { htmx })?;

        api_token(&session)
            .await
            .map(Self)
            .ok_or(AuthRejection { htmx })
    }
}

// =============================================================================
// RequireAdmin
// =============================================================================

/// Extractor that requires an admin session.
///
/// Performs one fresh admin check per use; the result is never cached.
pub struct RequireAdmin(pub String);

/// Rejection for [`RequireAdmin`].
pub enum AdminRejection {
    /// No token present: redirect to login.
    ToLogin { htmx: bool },
    /// Denied or erroring admin check: redirect to home.
    ToHome { htmx: bool },
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::ToLogin { htmx } => redirect_for(htmx, "/login"),
            Self::ToHome { htmx } => redirect_for(htmx, "/"),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let htmx = is_htmx(parts);

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminRejection::ToLogin { htmx })?;

        let Some(token) = api_token(&session).await else {
            return Err(AdminRejection::ToLogin { htmx });
        };

        match state.api().check_admin(&token).await {
            Ok(true) => Ok(Self(token)),
            Ok(false) => Err(AdminRejection::ToHome { htmx }),
            Err(err) => {
                // Denied and erroring checks end up at the same place, but
                // transport errors are visible in the logs.
                tracing::warn!(error = %err, "admin check failed");
                Err(AdminRejection::ToHome { htmx })
            }
        }
    }
}
