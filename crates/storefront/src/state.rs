//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, SingleFlight};
use crate::api::types::Cart;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// backend API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    cart_refresh: SingleFlight<String, Result<Cart, ApiError>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, reqwest::Error> {
        let api = ApiClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cart_refresh: SingleFlight::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get the per-session cart refresh coalescer.
    ///
    /// Both the periodic poll and mutation-triggered reloads refresh the
    /// cart through this, so concurrent refreshes for one session share a
    /// single in-flight request.
    #[must_use]
    pub fn cart_refresh(&self) -> &SingleFlight<String, Result<Cart, ApiError>> {
        &self.inner.cart_refresh
    }
}
