//! Authentication route handlers.
//!
//! Handles signup, login (token issuance into the session cookie) and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{session_cookie, session_cookie_removal};
use crate::state::AppState;

const SIGNUP_SUCCESS_REDIRECT: &str =
    "/login?success=Account+created+successfully.+Please+log+in.";
const LOGIN_FAILURE_REDIRECT: &str = "/login?error=Invalid+credentials";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data (`application/x-www-form-urlencoded`).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
///
/// Re-rendered with the submitted values (never the passwords) on failure.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl SignupTemplate {
    fn with_error(form: &SignupForm, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            username: form.username.clone(),
            email: form.email.clone(),
            full_name: form.full_name.clone(),
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// On success, issues a session token into the `access_token` cookie and
/// redirects to the dashboard. Any mismatch redirects back to the login page
/// with the same message.
pub async fn token(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = state.auth();

    let Some(user) = auth.authenticate_user(&form.username, &form.password).await? else {
        tracing::warn!(username = %form.username, "login failed");
        return Ok(Redirect::to(LOGIN_FAILURE_REDIRECT).into_response());
    };

    let token = auth.create_access_token(&user)?;
    set_sentry_user(user.username.as_str(), Some(user.email.as_str()));
    tracing::info!(username = %user.username, "user logged in");

    Ok((jar.add(session_cookie(token)), Redirect::to("/dashboard")).into_response())
}

/// Clear the session cookie and return to the landing page.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    clear_sentry_user();
    (jar.remove(session_cookie_removal()), Redirect::to("/"))
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page() -> impl IntoResponse {
    SignupTemplate::default()
}

/// Handle signup form submission.
///
/// Validation failures and duplicates re-render the form with a message and
/// leave the credential store untouched.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    if form.password != form.confirm_password {
        return Ok(SignupTemplate::with_error(&form, "Passwords do not match").into_response());
    }

    match state
        .auth()
        .create_user(&form.username, &form.email, &form.full_name, &form.password)
        .await
    {
        Ok(_) => Ok(Redirect::to(SIGNUP_SUCCESS_REDIRECT).into_response()),
        Err(e) => match e.user_message() {
            Some(message) => {
                tracing::warn!(username = %form.username, error = %e, "signup rejected");
                Ok(SignupTemplate::with_error(&form, message).into_response())
            }
            None => Err(AppError::Auth(e)),
        },
    }
}

