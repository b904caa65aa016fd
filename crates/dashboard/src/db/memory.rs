//! In-memory [`UserStore`] used by tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use campaign_dashboard_core::Username;

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// A [`UserStore`] that keeps records in a vector.
///
/// Uniqueness rules match the `PostgreSQL` schema. The number of `insert`
/// calls is tracked so callers can assert that a code path never wrote.
#[derive(Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<(User, String)>>,
    insert_calls: AtomicUsize,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `insert` has been called, successful or not.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Remove a user, simulating deletion outside the application.
    pub async fn remove(&self, username: &Username) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(user, _)| &user.username != username);
        records.len() != before
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.write().await;
        if records.iter().any(|(u, _)| u.username == user.username) {
            return Err(RepositoryError::Conflict("username".to_owned()));
        }
        if records.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email".to_owned()));
        }

        let created = User {
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            created_at: Utc::now(),
        };
        records.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|(u, _)| &u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|(u, _)| &u.username == username)
            .cloned())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
