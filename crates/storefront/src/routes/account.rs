//! User dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::middleware::api_token;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/dashboard.html")]
pub struct DashboardTemplate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_label: &'static str,
    pub is_admin: bool,
    pub authenticated: bool,
}

/// Display the dashboard with the profile from `GET /auth/me`.
///
/// Visiting without a session (or with an expired one) surfaces as an
/// authority failure, which the session-expiry policy turns into a login
/// redirect.
#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate, AppError> {
    let Some(token) = api_token(&session).await else {
        return Err(AppError::Api(ApiError::Unauthorized));
    };

    let profile = state.api().me(&token).await?;

    let is_admin = profile.role.is_admin();
    Ok(DashboardTemplate {
        first_name: profile.first_name,
        last_name: profile.last_name,
        email: profile.email,
        role_label: if is_admin { "Administrator" } else { "Customer" },
        is_admin,
        authenticated: true,
    })
}
