//! Middleware and extractors for the storefront.

pub mod auth;
pub mod policy;
pub mod request_id;
pub mod session;

pub use auth::{
    RequireAdmin, RequireAuth, api_token, clear_api_token, is_authenticated, set_api_token,
};
pub use policy::session_expiry_policy;
pub use request_id::request_id_middleware;
pub use session::session_layer;
