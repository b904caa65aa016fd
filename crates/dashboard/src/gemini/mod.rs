//! Generative-text provider integration.
//!
//! The suggestion pipeline only needs "prompt in, text out", expressed by the
//! [`TextGenerator`] trait. [`GeminiClient`] is the production implementation
//! over Google's `generateContent` REST endpoint.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, ProviderError};
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};

use async_trait::async_trait;

/// A remote model that turns a prompt into free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for transport, API, or empty-response failures.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
