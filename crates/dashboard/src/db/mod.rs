//! Credential store for dashboard users.
//!
//! # Database: `PostgreSQL`
//!
//! ## Tables
//!
//! - `dashboard.users` - Accounts (username and email are unique)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p campaign-dashboard-cli -- migrate
//! ```
//!
//! Request handlers only see the [`UserStore`] trait; [`PgUserStore`] is the
//! production implementation and [`MemoryUserStore`] backs the tests.

pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use campaign_dashboard_core::Username;

use crate::models::user::{NewUser, User};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Embedded migrations for the dashboard schema.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation; holds the conflicting field name.
    #[error("{0} already exists")]
    Conflict(String),
}

/// Async access to persisted user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user unless the username or email is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` naming the taken field.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Look a user up by username.
    async fn find_by_username(&self, username: &Username)
    -> Result<Option<User>, RepositoryError>;

    /// Look a user up by username, together with their password hash.
    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
