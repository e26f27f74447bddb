//! Product operations against the backend.
//!
//! Includes the admin mutations (create, update, delete, upload). These go
//! through the same request path as everything else; no code here builds
//! its own authorization header.

use axum::body::Bytes;
use reqwest::Method;
use tracing::instrument;

use shopstyle_core::ProductId;

use super::types::{Product, ProductRequest};
use super::{ApiClient, ApiError};

/// A product image as served by the backend: raw bytes plus content type.
///
/// The storefront streams these through to the browser and never retains
/// them.
#[derive(Debug, Clone)]
pub struct ProductImage {
    pub content_type: String,
    pub bytes: Bytes,
}

impl ApiClient {
    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the listing fails.
    #[instrument(skip(self, token))]
    pub async fn products(&self, token: Option<&str>) -> Result<Vec<Product>, ApiError> {
        self.send_json(self.request(Method::GET, "/products", token))
            .await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the product cannot be fetched.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId, token: Option<&str>) -> Result<Product, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/products/{id}"), token))
            .await
    }

    /// Fetch a product's image bytes.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the image cannot be fetched.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn product_image(
        &self,
        id: ProductId,
        token: Option<&str>,
    ) -> Result<ProductImage, ApiError> {
        let response = self
            .send(self.request(Method::GET, &format!("/products/image/{id}"), token))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response.bytes().await.map_err(ApiError::from)?;

        Ok(ProductImage {
            content_type,
            bytes,
        })
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for non-admin tokens, or another
    /// classified error.
    #[instrument(skip(self, token, request), fields(name = %request.name))]
    pub async fn create_product(
        &self,
        token: &str,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        self.send_json(
            self.request(Method::POST, "/products", Some(token))
                .json(request),
        )
        .await
    }

    /// Update a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for non-admin tokens, or another
    /// classified error.
    #[instrument(skip(self, token, request), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &str,
        id: ProductId,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        self.send_json(
            self.request(Method::PUT, &format!("/products/{id}"), Some(token))
                .json(request),
        )
        .await
    }

    /// Delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` for non-admin tokens, or another
    /// classified error.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &str, id: ProductId) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, &format!("/products/{id}"), Some(token)))
            .await
    }

    /// Upload a product image (admin, multipart).
    ///
    /// Returns the image path the backend stored the file under.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the upload fails.
    #[instrument(skip(self, token, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .send(
                self.request(Method::POST, "/products/upload", Some(token))
                    .multipart(form),
            )
            .await?;

        response.text().await.map_err(ApiError::from)
    }
}
