//! Gemini connectivity check.
//!
//! Sends one short prompt with the server's Gemini settings and prints the
//! reply, so a bad key or model name shows up before the dashboard is started.
//!
//! # Usage
//!
//! ```bash
//! dash-cli gemini check
//! dash-cli gemini check --prompt "Say hi"
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - API key (required)
//! - `GEMINI_MODEL` - Model identifier (default: gemini-2.5-flash)
//! - `GEMINI_BASE_URL` - API base URL

use thiserror::Error;

use campaign_dashboard::config::GeminiConfig;
use campaign_dashboard::gemini::{GeminiClient, ProviderError};

use super::{CommandError, env_lookup};

/// Prompt sent when none is given.
pub const CHECK_PROMPT: &str = r#"Return ONLY valid JSON:
{
  "status": "ok",
  "message": "Gemini model working"
}
"#;

/// Errors that can occur during the check.
#[derive(Debug, Error)]
pub enum GeminiCheckError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The provider call failed.
    #[error("Gemini error: {0}")]
    Provider(#[from] ProviderError),
}

/// Load the Gemini settings from the environment and run the check.
pub async fn check(prompt: Option<&str>) -> Result<(), GeminiCheckError> {
    let config = GeminiConfig::from_lookup(env_lookup()).map_err(CommandError::from)?;

    let reply = check_with(&config, prompt.unwrap_or(CHECK_PROMPT)).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{reply}");
    }

    Ok(())
}

/// Send `prompt` to the configured model and return its reply.
///
/// The call is bounded by the configured timeout.
pub async fn check_with(config: &GeminiConfig, prompt: &str) -> Result<String, ProviderError> {
    let client = GeminiClient::new(config)?;
    tracing::info!(model = %client.model(), base_url = %config.base_url, "Calling Gemini");

    tokio::time::timeout(config.timeout, client.generate_content(prompt))
        .await
        .map_err(|_| ProviderError::Timeout(config.timeout.as_secs()))?
}
