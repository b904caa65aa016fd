//! Integration tests for the campaign dashboard.
//!
//! Each test starts the full application router on an ephemeral local port
//! with an in-memory credential store and a scripted text generator, then
//! drives it over HTTP. No database or Gemini credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p campaign-dashboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - signup, login, session cookie and logout
//! - `campaign_suggestion` - the suggestion API with scripted model output
//! - `gemini_client` - the Gemini HTTP client against a local stand-in API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, Response, redirect::Policy};
use tokio::net::TcpListener;

use campaign_dashboard::config::DashboardConfig;
use campaign_dashboard::db::MemoryUserStore;
use campaign_dashboard::gemini::{ProviderError, TextGenerator};
use campaign_dashboard::routes;
use campaign_dashboard::state::AppState;

/// Token secret accepted by the configuration's strength checks.
pub const TOKEN_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Model reply in the canonical four-field shape.
pub const CANONICAL_REPLY: &str = r#"Sure! {"title":"Spring Sale","description":"Seasonal push","targeting":"Age: 25-44, Location: Austin, Interests: Fitness","adText":"Get fit this spring"}"#;

/// Build a configuration from defaults plus `overrides`.
///
/// # Panics
///
/// Panics if the resulting configuration is invalid.
#[must_use]
pub fn test_config(overrides: &[(&str, &str)]) -> DashboardConfig {
    let mut vars: HashMap<String, String> = [
        ("DASHBOARD_DATABASE_URL", "postgres://localhost/unused"),
        ("DASHBOARD_TOKEN_SECRET", TOKEN_SECRET),
        ("GEMINI_API_KEY", "test-api-key"),
        (
            "DASHBOARD_STATIC_DIR",
            concat!(env!("CARGO_MANIFEST_DIR"), "/../dashboard/static"),
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    DashboardConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid test configuration")
}

/// Text generator with a fixed outcome that records every prompt.
pub struct ScriptedGenerator {
    reply: Result<String, fn() -> ProviderError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Always answer with `reply`.
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with the error `make_error` builds.
    #[must_use]
    pub fn failing(make_error: fn() -> ProviderError) -> Self {
        Self {
            reply: Err(make_error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    ///
    /// # Panics
    ///
    /// Panics if the prompt log is poisoned.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .expect("prompt log")
            .push(prompt.to_string());
        self.reply.clone().map_err(|make_error| make_error())
    }
}

/// A running dashboard plus handles for inspecting it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub users: Arc<MemoryUserStore>,
    pub client: Client,
}

impl TestApp {
    /// Start the application with `generator` and the default test config.
    pub async fn spawn(generator: Arc<dyn TextGenerator>) -> Self {
        Self::spawn_with_config(test_config(&[]), generator).await
    }

    /// Start the application with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn_with_config(
        config: DashboardConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let addr = serve(AppState::new(config, users.clone(), generator)).await;

        Self {
            addr,
            users,
            client: browser(),
        }
    }

    /// Absolute URL for `path` on this app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `GET` a path with this app's client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// `POST` a form with this app's client.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(form_body(fields))
            .send()
            .await
            .expect("POST request")
    }

    /// Register a user through the signup form.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Response {
        self.post_form(
            "/signup",
            &[
                ("username", username),
                ("email", email),
                ("full_name", "Jane Doe"),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await
    }

    /// Log in through the login form.
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.post_form("/token", &[("username", username), ("password", password)])
            .await
    }
}

/// Serve the full application for `state` on an ephemeral local port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn serve(state: AppState) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state))
            .await
            .expect("test server");
    });
    addr
}

/// Client that keeps cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Encode `fields` as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
}

/// The `Set-Cookie` header for `name`, if the response sets one.
#[must_use]
pub fn set_cookie<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
}
