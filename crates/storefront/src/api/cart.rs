//! Cart operations against the backend.
//!
//! The cart is server-owned: every mutation returns whatever the server
//! decided, and callers re-fetch the whole cart afterwards rather than
//! patching local state. Totals always come from the server.

use reqwest::Method;
use tracing::instrument;

use shopstyle_core::ProductId;

use super::types::{Cart, CartItem};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the current cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token is invalid or expired.
    #[instrument(skip(self, token))]
    pub async fn cart(&self, token: &str) -> Result<Cart, ApiError> {
        self.send_json(self.request(Method::GET, "/cart", Some(token)))
            .await
    }

    /// Add a product to the cart.
    ///
    /// Returns the affected cart line as the server recorded it.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the product cannot be added.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ApiError> {
        self.send_json(
            self.request(
                Method::POST,
                &format!("/cart/add/{product_id}"),
                Some(token),
            )
            .query(&[("quantity", quantity)]),
        )
        .await
    }

    /// Change the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the update is rejected.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity))]
    pub async fn update_quantity(
        &self,
        token: &str,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        self.send_unit(
            self.request(
                Method::PUT,
                &format!("/cart/update/{product_id}"),
                Some(token),
            )
            .query(&[("quantity", quantity)]),
        )
        .await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the removal is rejected.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        token: &str,
        product_id: ProductId,
    ) -> Result<(), ApiError> {
        self.send_unit(self.request(
            Method::DELETE,
            &format!("/cart/remove/{product_id}"),
            Some(token),
        ))
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a classified error if the cart cannot be cleared.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, "/cart/clear", Some(token)))
            .await
    }
}
