//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Handlers that can fail return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::suggestion::SuggestionError;

/// Body returned by the suggestion endpoint on any failure.
pub const SUGGESTION_ERROR: &str = "Could not generate campaign suggestion";
/// Message accompanying [`SUGGESTION_ERROR`].
pub const SUGGESTION_ERROR_MESSAGE: &str =
    "AI service unavailable. Check GEMINI_API_KEY and model configuration.";

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
}

/// Application-level error type for the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Any failure of the suggestion pipeline.
    #[error("Suggestion unavailable: {0}")]
    SuggestionUnavailable(#[from] SuggestionError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SuggestionUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::UnknownUser => StatusCode::UNAUTHORIZED,
                AuthError::DuplicateUser(_) => StatusCode::CONFLICT,
                AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidFullName
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenEncoding => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        match self {
            Self::SuggestionUnavailable(_) => (
                status,
                Json(ErrorBody {
                    error: SUGGESTION_ERROR,
                    message: SUGGESTION_ERROR_MESSAGE,
                }),
            )
                .into_response(),
            Self::Auth(err) => {
                let message = err.user_message().unwrap_or_else(|| match status {
                    StatusCode::UNAUTHORIZED => "Not authenticated".to_string(),
                    _ => "Internal server error".to_string(),
                });
                (status, message).into_response()
            }
        }
    }
}

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
