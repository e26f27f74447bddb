//! Cart route handlers.
//!
//! The cart page is server-rendered and kept fresh with HTMX: the items
//! fragment refetches on a fixed interval for as long as the page is open,
//! and every mutation re-fetches the whole cart rather than patching local
//! state. All refreshes flow through the per-session single-flight
//! coalescer, so a poll tick and a mutation-triggered reload never race;
//! whichever request is in flight is the one everybody observes.
//!
//! Rendered totals are always the server's. Nothing is computed locally.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopstyle_core::ProductId;

use crate::api::ApiError;
use crate::api::types::{Cart, CartItem};
use crate::error::AppError;
use crate::filters::{self, format_price};
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i64,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image_url: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.as_i64(),
            name: item.product_name.clone(),
            unit_price: format_price(item.price),
            quantity: item.quantity,
            line_total: format_price(item.total_price),
            image_url: format!("/products/{}/image", item.product_id),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: format_price(0.0),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total: format_price(cart.total_price),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub error: Option<String>,
    pub poll_secs: u64,
    pub authenticated: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Add-to-cart result fragment template (for HTMX, on the home page).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_result.html")]
pub struct AddResultTemplate {
    pub message: String,
    pub ok: bool,
}

// =============================================================================
// Refresh
// =============================================================================

/// Re-fetch the cart through the per-session single-flight coalescer.
async fn refresh(state: &AppState, session: &Session, token: &str) -> Result<Cart, ApiError> {
    let key = session
        .id()
        .map_or_else(String::new, |id| id.to_string());
    let api = state.api().clone();
    let token = token.to_owned();

    state
        .cart_refresh()
        .run(key, move || async move { api.cart(&token).await })
        .await
}

/// Refresh and render the items fragment, surfacing `error` if given.
async fn items_fragment(
    state: &AppState,
    session: &Session,
    token: &str,
    error: Option<String>,
) -> Result<CartItemsTemplate, AppError> {
    match refresh(state, session, token).await {
        Ok(cart) => Ok(CartItemsTemplate {
            cart: CartView::from(&cart),
            error,
        }),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => Ok(CartItemsTemplate {
            cart: CartView::empty(),
            error: Some(error.unwrap_or_else(|| err.to_string())),
        }),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
///
/// Performs the immediate fetch; the rendered fragment then re-polls on the
/// configured interval.
#[instrument(skip(state, session, token))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
) -> Result<Response, AppError> {
    let poll_secs = state.config().cart_poll_secs;

    let (cart, error) = match refresh(&state, &session, &token).await {
        Ok(cart) => (CartView::from(&cart), None),
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load cart");
            (CartView::empty(), Some(err.to_string()))
        }
    };

    Ok(CartShowTemplate {
        cart,
        error,
        poll_secs,
        authenticated: true,
    }
    .into_response())
}

/// Cart items fragment, requested by the page poll.
///
/// On a non-authority failure the poll returns 204 No Content, which HTMX
/// does not swap: the visitor keeps the last successfully rendered state
/// and the failure only shows up in the logs.
#[instrument(skip(state, session, token))]
pub async fn items(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
) -> Result<Response, AppError> {
    match refresh(&state, &session, &token).await {
        Ok(cart) => Ok(CartItemsTemplate {
            cart: CartView::from(&cart),
            error: None,
        }
        .into_response()),
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => {
            tracing::warn!(error = %err, "cart poll failed, keeping last rendered state");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// Add a product to the cart (HTMX, from the home page).
#[instrument(skip(state, session, token))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let quantity = form.quantity.unwrap_or(1);

    match state
        .api()
        .add_to_cart(&token, form.product_id, quantity)
        .await
    {
        Ok(_) => {
            // The cart page listens for this to refresh its fragment
            let _ = refresh(&state, &session, &token).await;
            Ok((
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                AddResultTemplate {
                    message: "Added to cart".to_string(),
                    ok: true,
                },
            )
                .into_response())
        }
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => Ok(AddResultTemplate {
            message: err.to_string(),
            ok: false,
        }
        .into_response()),
    }
}

/// Change a cart line's quantity (HTMX).
///
/// Quantities below 1 are ignored, matching the page controls.
#[instrument(skip(state, session, token))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    if form.quantity < 1 {
        return Ok(items_fragment(&state, &session, &token, None)
            .await?
            .into_response());
    }

    let error = match state
        .api()
        .update_quantity(&token, form.product_id, form.quantity)
        .await
    {
        Ok(()) => None,
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => Some(err.to_string()),
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &session, &token, error).await?,
    )
        .into_response())
}

/// Remove a product from the cart (HTMX).
#[instrument(skip(state, session, token))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let error = match state.api().remove_from_cart(&token, form.product_id).await {
        Ok(()) => None,
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => Some(err.to_string()),
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &session, &token, error).await?,
    )
        .into_response())
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session, token))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(token): RequireAuth,
) -> Result<Response, AppError> {
    let error = match state.api().clear_cart(&token).await {
        Ok(()) => None,
        Err(ApiError::Unauthorized) => return Err(AppError::Api(ApiError::Unauthorized)),
        Err(err) => Some(err.to_string()),
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        items_fragment(&state, &session, &token, error).await?,
    )
        .into_response())
}
