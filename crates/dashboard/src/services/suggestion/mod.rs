//! Campaign suggestion pipeline.
//!
//! Prompt in, normalized [`CampaignSuggestion`] out. A service is built per
//! request over borrowed shared state; nothing is cached between requests and
//! failed calls are never retried.

mod parse;
mod prompt;
mod vocabulary;

pub use parse::{extract_json_object, parse_suggestion};
pub use prompt::build_prompt;
pub use vocabulary::{INTERESTS, LOCATIONS, Vocabulary};

use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use campaign_dashboard_core::CampaignSuggestion;

use crate::gemini::{ProviderError, TextGenerator};

/// Errors that can occur while producing a suggestion.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// The provider call failed or timed out.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// No parseable JSON object in the model output.
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),

    /// Parsed JSON lacks required fields.
    #[error("model output missing fields: {}", .0.join(", "))]
    IncompleteModelOutput(Vec<&'static str>),

    /// The request itself could not be read.
    #[error("invalid suggestion request: {0}")]
    InvalidRequest(String),
}

/// Suggestion service.
pub struct SuggestionService<'a> {
    generator: &'a dyn TextGenerator,
    vocabulary: &'a Vocabulary,
    timeout: Duration,
}

impl<'a> SuggestionService<'a> {
    /// Create a new suggestion service.
    #[must_use]
    pub const fn new(
        generator: &'a dyn TextGenerator,
        vocabulary: &'a Vocabulary,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            vocabulary,
            timeout,
        }
    }

    /// Render the prompt for `business_type`.
    #[must_use]
    pub fn build_prompt(&self, business_type: Option<&str>) -> String {
        build_prompt(self.vocabulary, business_type)
    }

    /// Ask the model for a suggestion and normalize its answer.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::Provider` if the call fails or exceeds the
    /// timeout, and `MalformedModelOutput`/`IncompleteModelOutput` if the reply
    /// cannot be turned into a complete suggestion.
    #[instrument(skip(self))]
    pub async fn request_suggestion(
        &self,
        business_type: Option<&str>,
    ) -> Result<CampaignSuggestion, SuggestionError> {
        let prompt = self.build_prompt(business_type);

        let text = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;

        let suggestion = parse_suggestion(&text, self.vocabulary).inspect_err(|e| {
            tracing::warn!(error = %e, output_len = text.len(), "unusable model output");
        })?;

        tracing::info!(title = %suggestion.title, "campaign suggestion generated");
        Ok(suggestion)
    }
}
