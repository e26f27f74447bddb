//! ShopStyle Core - Shared types library.
//!
//! This crate provides common types used by the ShopStyle storefront:
//! type-safe entity IDs, the email address wrapper used by the auth forms,
//! and the user role enum returned by the backend.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
