//! Authentication service.
//!
//! Provides password signup/login and session-token resolution.

mod error;
mod token;

pub use error::AuthError;
pub use token::{SessionClaims, TokenService};

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use campaign_dashboard_core::{Email, Username};

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash verified against when the username is unknown, so both login failure
/// paths do the same amount of work.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-for-timing").ok());

/// Authentication service.
///
/// Handles user registration, login, and session-token resolution.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, tokens: &'a TokenService) -> Self {
        Self { users, tokens }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername`, `InvalidEmail`, `InvalidFullName`
    /// or `WeakPassword` if the input fails validation.
    /// Returns `AuthError::DuplicateUser` if the username or email is taken.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(AuthError::InvalidFullName);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                full_name: full_name.to_owned(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(field) => AuthError::DuplicateUser(field),
                other => AuthError::Repository(other),
            })?;

        tracing::info!(username = %user.username, "user created");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Returns `Ok(None)` on any mismatch; an unknown username and a wrong
    /// password are indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store cannot be queried.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        let Ok(username) = Username::parse(username) else {
            burn_dummy_verification(password);
            return Ok(None);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&username).await? else {
            burn_dummy_verification(password);
            return Ok(None);
        };

        match verify_password(password, &password_hash) {
            Ok(()) => Ok(Some(user)),
            Err(_) => Ok(None),
        }
    }

    // =========================================================================
    // Session Tokens
    // =========================================================================

    /// Issue a session token for `user` with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn create_access_token(&self, user: &User) -> Result<String, AuthError> {
        self.tokens
            .create_access_token(user.username.as_str(), self.tokens.ttl())
    }

    /// Resolve a session token to the user it names.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for a bad signature or malformed token,
    /// `AuthError::ExpiredToken` once the expiry has passed, and
    /// `AuthError::UnknownUser` if the subject no longer exists.
    pub async fn get_current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.validate(token)?;
        let username = Username::parse(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.users
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UnknownUser)
    }

    /// Resolve an optional token, treating every failure as anonymous.
    pub async fn resolve_optional_identity(&self, token: Option<&str>) -> Option<User> {
        let token = token?;
        match self.get_current_user(token).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable session token");
                None
            }
        }
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

fn burn_dummy_verification(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use secrecy::SecretString;

    use super::*;
    use crate::db::MemoryUserStore;

    const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn tokens() -> TokenService {
        TokenService::new(&SecretString::from(SECRET), Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        auth.create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();

        let user = auth.authenticate_user("jane", "hunter22!").await.unwrap();
        assert_eq!(user.unwrap().full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        auth.create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();

        let err = auth
            .create_user("jane", "other@example.com", "Other", "hunter22!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(ref f) if f == "username"));

        let err = auth
            .create_user("other", "jane@example.com", "Other", "hunter22!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser(ref f) if f == "email"));

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        auth.create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();

        let wrong_password = auth.authenticate_user("jane", "wrong-pass").await.unwrap();
        let unknown_user = auth.authenticate_user("nobody", "hunter22!").await.unwrap();
        let bad_username = auth.authenticate_user("not valid!", "x").await.unwrap();

        assert!(wrong_password.is_none());
        assert!(unknown_user.is_none());
        assert!(bad_username.is_none());
    }

    #[tokio::test]
    async fn test_validation_never_touches_store() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        let cases = [
            ("", "jane@example.com", "Jane", "hunter22!"),
            ("jane", "not-an-email", "Jane", "hunter22!"),
            ("jane", "jane@example.com", "   ", "hunter22!"),
            ("jane", "jane@example.com", "Jane", "short"),
        ];
        for (username, email, full_name, password) in cases {
            assert!(
                auth.create_user(username, email, full_name, password)
                    .await
                    .unwrap_err()
                    .is_client_error()
            );
        }

        assert_eq!(store.insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        auth.create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();

        let (_, hash) = store
            .get_password_hash(&Username::parse("jane").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("hunter22!"));
    }

    #[tokio::test]
    async fn test_token_resolves_to_user() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        let user = auth
            .create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();
        let token = auth.create_access_token(&user).unwrap();

        assert_eq!(auth.get_current_user(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let store = MemoryUserStore::new();
        let tokens = TokenService::new(&SecretString::from(SECRET), Duration::seconds(-1));
        let auth = AuthService::new(&store, &tokens);

        let user = auth
            .create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();
        let token = auth.create_access_token(&user).unwrap();

        assert!(matches!(
            auth.get_current_user(&token).await,
            Err(AuthError::ExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_after_removal() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        let user = auth
            .create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();
        let token = auth.create_access_token(&user).unwrap();
        store.remove(&user.username).await;

        assert!(matches!(
            auth.get_current_user(&token).await,
            Err(AuthError::UnknownUser)
        ));
    }

    #[tokio::test]
    async fn test_resolve_optional_identity_never_fails() {
        let store = MemoryUserStore::new();
        let tokens = tokens();
        let auth = AuthService::new(&store, &tokens);

        assert!(auth.resolve_optional_identity(None).await.is_none());
        assert!(auth.resolve_optional_identity(Some("garbage")).await.is_none());

        let user = auth
            .create_user("jane", "jane@example.com", "Jane Doe", "hunter22!")
            .await
            .unwrap();
        let token = auth.create_access_token(&user).unwrap();
        assert_eq!(auth.resolve_optional_identity(Some(&token)).await, Some(user));
    }
}
