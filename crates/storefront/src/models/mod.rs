//! Session-stored types and keys.

pub mod session;

pub use session::keys as session_keys;
