//! Session-expiry policy.
//!
//! The backend client classifies an authority failure as
//! `ApiError::Unauthorized`, which route handlers surface as a plain 401
//! response. This middleware is the single place that reacts: it clears the
//! stored bearer token and sends the visitor to the login page. Keeping the
//! reaction here means the transport layer stays pure and no call site
//! hides a navigation side effect.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use super::auth::{clear_api_token, redirect_for};

/// Observe responses; on an authority failure (401), clear the session
/// token and redirect to the login page.
pub async fn session_expiry_policy(session: Session, request: Request, next: Next) -> Response {
    let htmx = request.headers().contains_key("hx-request");

    let response = next.run(request).await;

    if response.status() != StatusCode::UNAUTHORIZED {
        return response;
    }

    if let Err(err) = clear_api_token(&session).await {
        tracing::error!(error = %err, "failed to clear session token");
    }
    tracing::info!("authority failure observed, session cleared");

    redirect_for(htmx, "/login")
}
