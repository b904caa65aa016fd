//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] campaign_dashboard_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] campaign_dashboard_core::EmailError),

    /// Full name missing.
    #[error("full name cannot be empty")]
    InvalidFullName,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Username or email already registered; holds the conflicting field.
    #[error("{0} already registered")]
    DuplicateUser(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token signature did not verify, or the token is malformed.
    #[error("invalid token")]
    InvalidToken,

    /// Token was valid but its expiry has passed.
    #[error("token expired")]
    ExpiredToken,

    /// Token subject no longer resolves to a user.
    #[error("unknown user")]
    UnknownUser,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token encoding error")]
    TokenEncoding,
}

impl AuthError {
    /// Message safe to show on the signup form.
    ///
    /// Returns `None` for errors that must not be described to the user.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::InvalidUsername(e) => Some(capitalize(&e.to_string())),
            Self::InvalidEmail(e) => Some(capitalize(&e.to_string())),
            Self::InvalidFullName => Some("Full name cannot be empty".to_string()),
            Self::WeakPassword(reason) => Some(capitalize(reason)),
            Self::DuplicateUser(field) => Some(format!("{} already registered", capitalize(field))),
            Self::InvalidCredentials => Some("Invalid credentials".to_string()),
            Self::InvalidToken
            | Self::ExpiredToken
            | Self::UnknownUser
            | Self::Repository(_)
            | Self::PasswordHash
            | Self::TokenEncoding => None,
        }
    }

    /// Whether this error is the caller's fault rather than a server failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Repository(_) | Self::PasswordHash | Self::TokenEncoding
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
