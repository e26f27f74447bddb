//! Home page: the product listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::Product;
use crate::error::AppError;
use crate::filters::{self, format_price};
use crate::middleware::api_token;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: format_price(product.price),
            // Served through the local proxy; per-image failures degrade to
            // a broken image slot, never the whole page
            image_url: format!("/products/{}/image", product.id),
            in_stock: product.stock > 0,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub error: Option<String>,
    pub authenticated: bool,
}

/// Display the home page with the full product listing.
///
/// The listing is fetched fresh on every view; nothing is cached across
/// navigations.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let token = api_token(&session).await;
    let authenticated = token.is_some();

    let (products, error) = match state.api().products(token.as_deref()).await {
        Ok(products) => (products.iter().map(ProductCardView::from).collect(), None),
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load product listing");
            (Vec::new(), Some(err.to_string()))
        }
    };

    Ok(HomeTemplate {
        products,
        error,
        authenticated,
    })
}
