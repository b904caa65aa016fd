//! `PostgreSQL` user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use campaign_dashboard_core::{Email, Username};

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "username, email, full_name, password_hash, created_at";

/// Row shape of `dashboard.users`.
#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert into a validated domain user, returning the password hash alongside.
    fn into_domain(self) -> Result<(User, String), RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            User {
                username,
                email,
                full_name: self.full_name,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// `PostgreSQL`-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM dashboard.users WHERE username = $1"
        ))
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO dashboard.users (username, email, full_name, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                let field = match db_err.constraint() {
                    Some("users_email_key") => "email",
                    _ => "username",
                };
                return RepositoryError::Conflict(field.to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let (user, _) = row.into_domain()?;
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.fetch_by_username(username).await?.map(|(user, _)| user))
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.fetch_by_username(username).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
