//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! DASH_CLI_PASSWORD='correct horse battery' \
//!     dash-cli user create -u jane -e jane@example.com -n "Jane Doe"
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `DASHBOARD_TOKEN_SECRET` - Session token signing secret, checked with the server's
//!   rules (no token is issued)
//! - `DASH_CLI_PASSWORD` - Password for the new user

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use campaign_dashboard::config::AuthConfig;
use campaign_dashboard::db::{self, PgUserStore};
use campaign_dashboard::services::auth::{AuthError, AuthService, TokenService};

use super::{CommandError, database_url, env_lookup};

/// Environment variable holding the new user's password.
const PASSWORD_VAR: &str = "DASH_CLI_PASSWORD";

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Username or email already taken.
    #[error("User already exists: {0} already registered")]
    UserExists(String),

    /// Input rejected by validation, or a store failure.
    #[error(transparent)]
    Auth(AuthError),
}

/// Create a new user.
///
/// # Arguments
///
/// * `username` - Login name
/// * `email` - Email address
/// * `full_name` - Display name
pub async fn create(username: &str, email: &str, full_name: &str) -> Result<(), UserError> {
    let database_url = database_url()?;
    let password = std::env::var(PASSWORD_VAR)
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(PASSWORD_VAR))?;
    let auth_config = AuthConfig::from_lookup(env_lookup()).map_err(CommandError::from)?;

    let pool = db::create_pool(&database_url)
        .await
        .map_err(CommandError::from)?;
    let store = PgUserStore::new(pool);
    let tokens = TokenService::from_config(&auth_config);
    let auth = AuthService::new(&store, &tokens);

    let user = auth
        .create_user(username, email, full_name, password.expose_secret())
        .await
        .map_err(|e| match e {
            AuthError::DuplicateUser(field) => UserError::UserExists(field),
            other => UserError::Auth(other),
        })?;

    tracing::info!(username = %user.username, "User created");

    #[allow(clippy::print_stdout)]
    {
        println!("Created user {} <{}>", user.username, user.email);
    }

    Ok(())
}
