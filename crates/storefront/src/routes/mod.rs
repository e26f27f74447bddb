//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page (product listing)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (backend reachable)
//!
//! # Static pages
//! GET  /why-us                  - Why Us page
//! GET  /address                 - Address page
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /register                - Register page
//! POST /register                - Register action
//! POST /logout                  - Logout action
//!
//! # Products
//! GET  /products/{id}/image     - Product image proxy (streamed from backend)
//!
//! # Cart (requires auth; HTMX fragments)
//! GET  /cart                    - Cart page
//! GET  /cart/items              - Cart items fragment (polled every 10s)
//! POST /cart/add                - Add product (from the home page)
//! POST /cart/update             - Change quantity (returns cart_items fragment)
//! POST /cart/remove             - Remove item (returns cart_items fragment)
//! POST /cart/clear              - Empty the cart (returns cart_items fragment)
//!
//! # Account
//! GET  /dashboard               - User dashboard (profile via /auth/me)
//!
//! # Admin (requires admin check)
//! GET  /admin/products          - Product management page
//! POST /admin/products          - Create product (multipart, image pipeline)
//! POST /admin/products/{id}     - Update product (multipart)
//! POST /admin/products/{id}/delete - Delete product
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display after a redirect.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", get(cart::items))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::index).post(admin::create))
        .route("/products/{id}", post(admin::update))
        .route("/products/{id}/delete", post(admin::delete))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::index))
        // Static pages
        .route("/why-us", get(pages::why_us))
        .route("/address", get(pages::address))
        // Product image proxy
        .route("/products/{id}/image", get(products::image))
        // Cart routes
        .nest("/cart", cart_routes())
        // Dashboard
        .route("/dashboard", get(account::dashboard))
        // Admin routes
        .nest("/admin", admin_routes())
        // Auth routes
        .merge(auth_routes())
}
