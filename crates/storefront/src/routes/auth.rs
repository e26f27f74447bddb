//! Authentication route handlers.
//!
//! Login and registration delegate entirely to the backend; on success the
//! returned bearer token is stored in the session. Failures land back on
//! the form with the classified error's message in the query string.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopstyle_core::Email;

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::filters;
use crate::middleware::{clear_api_token, is_authenticated, set_api_token};
use crate::routes::MessageQuery;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub authenticated: bool,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub authenticated: bool,
}

fn back_with_error(page: &str, message: &str) -> Response {
    Redirect::to(&format!("{page}?error={}", urlencoding::encode(message))).into_response()
}

/// Validate the fields every auth form requires.
///
/// Only basic required-field checks are performed client-side; the backend
/// remains the authority on credentials.
fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Email and password are required".to_string());
    }
    Email::parse(email.trim()).map_err(|err| err.to_string())?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip(session))]
pub async fn login_page(
    Query(query): Query<MessageQuery>,
    session: Session,
) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
        authenticated: is_authenticated(&session).await,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(message) = validate_credentials(&form.email, &form.password) {
        return back_with_error("/login", &message);
    }

    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.api().login(&request).await {
        Ok(auth) => {
            if let Err(err) = set_api_token(&session, &auth.token).await {
                tracing::error!(error = %err, "failed to store session token");
                return back_with_error("/login", "Could not start a session, please try again");
            }
            tracing::info!("user logged in");
            Redirect::to("/").into_response()
        }
        Err(err) => back_with_error("/login", &err.to_string()),
    }
}

/// Display the registration page.
#[instrument(skip(session))]
pub async fn register_page(
    Query(query): Query<MessageQuery>,
    session: Session,
) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error,
        authenticated: is_authenticated(&session).await,
    }
}

/// Handle registration form submission.
///
/// A successful registration returns a token, so the new user is logged in
/// immediately.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        return back_with_error("/register", "First and last name are required");
    }
    if let Err(message) = validate_credentials(&form.email, &form.password) {
        return back_with_error("/register", &message);
    }

    let request = RegisterRequest {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.api().register(&request).await {
        Ok(auth) => {
            if let Err(err) = set_api_token(&session, &auth.token).await {
                tracing::error!(error = %err, "failed to store session token");
                return back_with_error("/register", "Could not start a session, please try again");
            }
            tracing::info!("user registered");
            Redirect::to("/").into_response()
        }
        Err(err) => back_with_error("/register", &err.to_string()),
    }
}

/// Handle logout: destroy the token and return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(err) = clear_api_token(&session).await {
        tracing::error!(error = %err, "failed to clear session token");
    }
    Redirect::to("/login").into_response()
}
