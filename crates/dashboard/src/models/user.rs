//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use campaign_dashboard_core::{Email, Username};

/// A dashboard account (domain type).
///
/// Created on signup and never mutated afterwards. The password hash is not
/// carried here; it only travels through [`NewUser`] and the store's
/// `get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// A user record ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub full_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}
