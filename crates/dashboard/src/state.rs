//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::db::UserStore;
use crate::gemini::TextGenerator;
use crate::services::auth::{AuthService, TokenService};
use crate::services::suggestion::{SuggestionService, Vocabulary};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything inside is
/// immutable after startup; the store and generator are trait objects so
/// tests can substitute in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    users: Arc<dyn UserStore>,
    generator: Arc<dyn TextGenerator>,
    tokens: TokenService,
    vocabulary: Vocabulary,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Dashboard configuration
    /// * `users` - Credential store
    /// * `generator` - Generative-text provider
    #[must_use]
    pub fn new(
        config: DashboardConfig,
        users: Arc<dyn UserStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let tokens = TokenService::from_config(&config.auth);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                generator,
                tokens,
                vocabulary: Vocabulary::default(),
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the session token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the vocabulary offered to the model.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.inner.vocabulary
    }

    /// Authentication service over this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users(), self.tokens())
    }

    /// A fresh suggestion service for one request.
    #[must_use]
    pub fn suggestions(&self) -> SuggestionService<'_> {
        SuggestionService::new(
            self.inner.generator.as_ref(),
            self.vocabulary(),
            self.config().gemini.timeout,
        )
    }
}
