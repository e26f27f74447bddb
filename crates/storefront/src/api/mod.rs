//! Commerce backend REST client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] instance through which *every* backend call flows,
//!   including the admin product operations
//! - The bearer token is an explicit argument on each call; when present it
//!   is attached as an `Authorization: Bearer` header, otherwise the request
//!   goes out unmodified
//! - Every non-success response is classified once, centrally, into the
//!   [`ApiError`] taxonomy; callers never re-classify
//! - No retries, no batching, no caching: each operation performs exactly
//!   one HTTP request
//!
//! # Example
//!
//! ```rust,ignore
//! use shopstyle_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config)?;
//!
//! // Login and use the returned token
//! let auth = api.login(&LoginRequest { email, password }).await?;
//! let cart = api.cart(&auth.token).await?;
//! ```

mod auth;
mod cart;
mod error;
mod products;
mod singleflight;
pub mod types;

pub use error::{ApiError, classify, messages, server_message};
pub use products::ProductImage;
pub use singleflight::SingleFlight;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::StorefrontConfig;

/// Client for the commerce backend REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Start a request to `path`, attaching the bearer token when present.
    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut builder = self.inner.http.request(method, self.endpoint(path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and classify any failure.
    ///
    /// Transport failures (no response) become [`ApiError::Network`];
    /// non-success statuses are classified by [`classify`], reading the
    /// backend's `message` field when the body carries one.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(error = %err, "backend request failed");
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify(status.as_u16(), server_message(&body)))
    }

    /// Send a request and decode the JSON response body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(error = %err, "failed to decode backend response");
            ApiError::Decode(err.to_string())
        })
    }

    /// Send a request, discarding the response body.
    async fn send_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await.map(|_| ())
    }
}
