//! Admin product management route handlers.
//!
//! Create and update accept a multipart form so a new image can ride along
//! with the product fields. A selected image goes through the resize
//! pipeline and is uploaded first; the returned path is then written into
//! the product. All backend calls use the shared `ApiClient` - the admin
//! screen has no transport path of its own.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use shopstyle_core::ProductId;

use crate::api::types::{Product, ProductRequest};
use crate::error::{AppError, UPLOAD_ERROR_MESSAGE};
use crate::filters::{self, format_price};
use crate::middleware::RequireAdmin;
use crate::routes::MessageQuery;
use crate::services::image::prepare_upload;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product row display data for the admin table.
#[derive(Clone)]
pub struct AdminProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Raw price for form prefill (no currency symbol)
    pub price_input: String,
    pub price: String,
    pub stock: i64,
    pub image_url: String,
    /// Backend image path, carried through the edit form unchanged when no
    /// new file is selected
    pub existing_image: String,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price_input: format!("{:.2}", product.price),
            price: format_price(product.price),
            stock: product.stock,
            image_url: format!("/products/{}/image", product.id),
            existing_image: product.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Admin products page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub products: Vec<AdminProductView>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub authenticated: bool,
}

// =============================================================================
// Multipart Form
// =============================================================================

/// Fields of the create/update product form.
#[derive(Default)]
struct ProductForm {
    name: String,
    description: String,
    price: Option<f64>,
    /// Existing backend image path (hidden field on the edit form)
    image_url: Option<String>,
    /// Newly selected image file, if any
    file: Option<(String, Vec<u8>)>,
}

/// Read the multipart product form.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => {
                form.name = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
            }
            "description" => {
                form.description = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
            }
            "price" => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
                form.price = text.trim().parse::<f64>().ok();
            }
            "image_url" => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
                if !text.is_empty() {
                    form.image_url = Some(text);
                }
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map_or_else(|| "upload.jpg".to_string(), ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::BadRequest(err.to_string()))?;
                // Browsers submit an empty file part when none was selected
                if !bytes.is_empty() {
                    form.file = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Validate the form and resolve its image, uploading a new file if one was
/// selected.
///
/// Returns the request to send, or a user-facing message describing why the
/// form was rejected.
async fn build_request(
    state: &AppState,
    token: &str,
    form: ProductForm,
) -> Result<ProductRequest, String> {
    if form.name.trim().is_empty() {
        return Err("Product name is required".to_string());
    }
    let Some(price) = form.price.filter(|price| *price > 0.0) else {
        return Err("A positive price is required".to_string());
    };

    let image_url = if let Some((file_name, bytes)) = form.file {
        // Downscale and re-encode before the original ever leaves this
        // process; the prepared bytes replace the selected file entirely
        let prepared = prepare_upload(&bytes).map_err(|err| {
            tracing::warn!(error = %err, "image preparation failed");
            UPLOAD_ERROR_MESSAGE.to_string()
        })?;

        state
            .api()
            .upload_image(token, &file_name, prepared)
            .await
            .map_err(|err| err.to_string())?
    } else {
        form.image_url
            .ok_or_else(|| "A product image is required".to_string())?
    };

    Ok(ProductRequest {
        name: form.name.trim().to_string(),
        description: form.description.trim().to_string(),
        price,
        image_url,
    })
}

fn back_to_products(result: Result<&str, &str>) -> Response {
    let query = match result {
        Ok(message) => format!("success={}", urlencoding::encode(message)),
        Err(message) => format!("error={}", urlencoding::encode(message)),
    };
    Redirect::to(&format!("/admin/products?{query}")).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product management page.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(token): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.api().products(Some(&token)).await?;

    Ok(AdminProductsTemplate {
        products: products.iter().map(AdminProductView::from).collect(),
        error: query.error,
        success: query.success,
        authenticated: true,
    })
}

/// Create a product.
#[instrument(skip(state, token, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(token): RequireAdmin,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_product_form(multipart).await?;

    let request = match build_request(&state, &token, form).await {
        Ok(request) => request,
        Err(message) => return Ok(back_to_products(Err(&message))),
    };

    match state.api().create_product(&token, &request).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            Ok(back_to_products(Ok("Product created")))
        }
        Err(err) => Ok(back_to_products(Err(&err.to_string()))),
    }
}

/// Update a product.
#[instrument(skip(state, token, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(token): RequireAdmin,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_product_form(multipart).await?;

    let request = match build_request(&state, &token, form).await {
        Ok(request) => request,
        Err(message) => return Ok(back_to_products(Err(&message))),
    };

    match state.api().update_product(&token, id, &request).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product updated");
            Ok(back_to_products(Ok("Product updated")))
        }
        Err(err) => Ok(back_to_products(Err(&err.to_string()))),
    }
}

/// Delete a product.
#[instrument(skip(state, token))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(token): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    match state.api().delete_product(&token, id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "product deleted");
            Ok(back_to_products(Ok("Product deleted")))
        }
        Err(err) => Ok(back_to_products(Err(&err.to_string()))),
    }
}
