//! CLI command implementations.

pub mod gemini;
pub mod migrate;
pub mod user;

use secrecy::SecretString;
use thiserror::Error;

use campaign_dashboard::config::ConfigError;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration section failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Environment lookup backed by the process environment and `.env`.
pub fn env_lookup() -> impl Fn(&str) -> Option<String> {
    let _ = dotenvy::dotenv();
    |key| std::env::var(key).ok()
}

/// Read the database URL, preferring `DASHBOARD_DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    let _ = dotenvy::dotenv();

    std::env::var("DASHBOARD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DASHBOARD_DATABASE_URL"))
}
