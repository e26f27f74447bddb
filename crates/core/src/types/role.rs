//! User role enum returned by the backend.

use serde::{Deserialize, Serialize};

/// Role of an authenticated user, as reported by `GET /auth/me`.
///
/// The backend serializes roles in SCREAMING_SNAKE_CASE (`"ADMIN"`, `"USER"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    /// Whether this role grants access to the admin screens.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
