//! Error types for the Gemini API client.

use thiserror::Error;

/// Errors that can occur when calling the text-generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response carried no text.
    #[error("model returned no text")]
    EmptyResponse,

    /// The call did not finish in time.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// The client could not be built from the configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

/// Error body returned by Google APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// HTTP status code echoed in the body.
    #[serde(default)]
    pub code: u16,
    /// Error message.
    pub message: String,
    /// Canonical status, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = ProviderError::Api {
            status: 400,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400): API key not valid");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 400,
                "message": "Invalid JSON payload received.",
                "status": "INVALID_ARGUMENT"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.code, 400);
        assert_eq!(response.error.message, "Invalid JSON payload received.");
        assert_eq!(response.error.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
