//! Product image proxy.
//!
//! Pages reference product images through this route; the bytes are
//! streamed from the backend per request and never retained. An individual
//! image failure is logged and yields a 404 for that one slot, leaving the
//! rest of the page intact.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopstyle_core::ProductId;

use crate::middleware::api_token;
use crate::state::AppState;

/// Stream one product's image from the backend.
#[instrument(skip(state, session))]
pub async fn image(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Response {
    let token = api_token(&session).await;

    match state.api().product_image(id, token.as_deref()).await {
        Ok(img) => ([(header::CONTENT_TYPE, img.content_type)], img.bytes).into_response(),
        Err(err) => {
            tracing::warn!(product_id = %id, error = %err, "product image fetch failed, skipping");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
