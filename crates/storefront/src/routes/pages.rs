//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::is_authenticated;

/// Why Us page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/why_us.html")]
pub struct WhyUsTemplate {
    pub authenticated: bool,
}

/// Address page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/address.html")]
pub struct AddressTemplate {
    pub authenticated: bool,
}

/// Display the Why Us page.
#[instrument(skip(session))]
pub async fn why_us(session: Session) -> impl IntoResponse {
    WhyUsTemplate {
        authenticated: is_authenticated(&session).await,
    }
}

/// Display the Address page.
#[instrument(skip(session))]
pub async fn address(session: Session) -> impl IntoResponse {
    AddressTemplate {
        authenticated: is_authenticated(&session).await,
    }
}
