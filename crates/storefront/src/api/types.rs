//! Wire types for the commerce backend API.
//!
//! The backend serializes field names in camelCase; every struct here maps
//! that to idiomatic snake_case fields. Monetary amounts arrive as JSON
//! numbers and are kept as `f64` copies: the storefront never performs
//! arithmetic on them, it only formats what the server returned.

use serde::{Deserialize, Serialize};

use shopstyle_core::{CartId, CartItemId, ProductId, UserRole};

/// Response of `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

/// A product as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i64,
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// The server-owned cart aggregate.
///
/// Rendered cart state is always a direct, unmodified copy of the most
/// recent response; totals are never recomputed locally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: f64,
}

/// One line of the cart, with denormalized product name and unit price.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
    pub total_price: f64,
}
