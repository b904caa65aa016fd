//! Gemini API client for campaign suggestions.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;

use super::TextGenerator;
use super::error::{ApiErrorResponse, ProviderError};
use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Idle connections kept per host by the shared pool.
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini API client.
///
/// Cheap to clone: clones share one connection pool and one immutable
/// configuration.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Config` if the API key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, ProviderError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ProviderError::Config("API key contains invalid characters".into()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: format!(
                    "{}/v1beta/models/{}:generateContent",
                    config.base_url, config.model
                ),
                model: config.model.clone(),
            }),
        })
    }

    /// Model identifier requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a single-turn prompt and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error status,
    /// or the response carries no text.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model))]
    pub async fn generate_content(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest::user_prompt(prompt);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.text().ok_or(ProviderError::EmptyResponse)
    }

    /// Handle an error status code.
    async fn handle_error_status(status: StatusCode, response: reqwest::Response) -> ProviderError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return ProviderError::RateLimited(retry_after);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ProviderError::Unauthorized("API key rejected".to_string());
        }

        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |api_error| api_error.error.message);
                ProviderError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => ProviderError::Http(e),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_content(prompt).await
    }
}
