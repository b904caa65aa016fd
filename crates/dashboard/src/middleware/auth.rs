//! Authentication extractors.
//!
//! The session token travels in the `access_token` cookie. [`RequireUser`]
//! rejects requests without a valid token; [`OptionalUser`] never rejects and
//! falls back to anonymous.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::user::User;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Name of the cookie holding the session token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Build the session cookie for a freshly issued token.
///
/// `HttpOnly`, site-wide, and without an explicit expiry: it lives for the
/// browser session while the token itself carries the real deadline.
#[must_use]
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .build()
}

/// A cookie that, when removed from a jar, clears the session cookie.
#[must_use]
pub fn session_cookie_removal() -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE).path("/").build()
}

/// Read the raw session token from request headers.
fn token_from_parts(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Error returned when authentication is required but missing or invalid.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login page with a hint (for HTML requests).
    RedirectToLogin(&'static str),
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The credential store failed.
    Unavailable,
}

impl AuthRejection {
    fn for_path(path: &str, hint: &'static str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin(hint)
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(hint) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(hint)))
                    .into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path();

        let Some(token) = token_from_parts(parts) else {
            return Err(AuthRejection::for_path(path, "Please log in"));
        };

        match state.auth().get_current_user(&token).await {
            Ok(user) => {
                tracing::Span::current().record("user.username", user.username.as_str());
                Ok(Self(user))
            }
            Err(AuthError::ExpiredToken) => Err(AuthRejection::for_path(
                path,
                "Session expired. Please log in again",
            )),
            Err(AuthError::InvalidToken | AuthError::UnknownUser) => {
                Err(AuthRejection::for_path(path, "Please log in"))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to resolve session");
                Err(AuthRejection::Unavailable)
            }
        }
    }
}

/// Extractor that optionally resolves the current user.
///
/// Unlike [`RequireUser`], this never rejects: any token problem is treated
/// as an anonymous request.
pub struct OptionalUser(pub Option<User>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts);
        let user = state
            .auth()
            .resolve_optional_identity(token.as_deref())
            .await;

        if let Some(ref user) = user {
            tracing::Span::current().record("user.username", user.username.as_str());
        }

        Ok(Self(user))
    }
}
