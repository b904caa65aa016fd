//! Integration tests for signup, login, the session cookie and logout.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use secrecy::SecretString;

use campaign_dashboard::db::{RepositoryError, UserStore};
use campaign_dashboard::models::{NewUser, User};
use campaign_dashboard::services::auth::TokenService;
use campaign_dashboard::state::AppState;
use campaign_dashboard_core::Username;
use campaign_dashboard_integration_tests::{
    CANONICAL_REPLY, ScriptedGenerator, TOKEN_SECRET, TestApp, browser, location, serve,
    set_cookie, test_config,
};

async fn spawn() -> TestApp {
    TestApp::spawn(Arc::new(ScriptedGenerator::replying(CANONICAL_REPLY))).await
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_login_dashboard_logout() {
    let app = spawn().await;

    let resp = app.signup("jane", "jane@example.com", "hunter22!").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/login?success=Account+created+successfully.+Please+log+in.")
    );
    assert_eq!(app.users.len().await, 1);

    let resp = app.login("jane", "hunter22!").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/dashboard"));
    let cookie = set_cookie(&resp, "access_token").expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Max-Age"));

    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Welcome, Jane"));
    assert!(body.contains("jane"));

    let resp = app.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
    assert!(set_cookie(&resp, "access_token").is_some());

    let resp = app.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login?error=Please%20log%20in"));
}

#[tokio::test]
async fn test_signup_password_mismatch_creates_nothing() {
    let app = spawn().await;

    let resp = app
        .post_form(
            "/signup",
            &[
                ("username", "jane"),
                ("email", "jane@example.com"),
                ("full_name", "Jane Doe"),
                ("password", "hunter22!"),
                ("confirm_password", "hunter23!"),
            ],
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Passwords do not match"));
    assert!(body.contains("jane@example.com"));
    assert!(!body.contains("hunter22!"));
    assert_eq!(app.users.insert_calls(), 0);
}

#[tokio::test]
async fn test_signup_duplicate_username_rerenders_form() {
    let app = spawn().await;
    app.signup("jane", "jane@example.com", "hunter22!").await;

    let resp = app.signup("jane", "other@example.com", "hunter22!").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Username already registered"));

    let resp = app.signup("other", "jane@example.com", "hunter22!").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Email already registered"));

    assert_eq!(app.users.len().await, 1);
}

#[tokio::test]
async fn test_signup_invalid_email_rerenders_form() {
    let app = spawn().await;

    let resp = app.signup("jane", "not-an-email", "hunter22!").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("alert-error"));
    assert_eq!(app.users.insert_calls(), 0);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_failures_share_one_redirect() {
    let app = spawn().await;
    app.signup("jane", "jane@example.com", "hunter22!").await;

    let wrong_password = app.login("jane", "wrong-password").await;
    let unknown_user = app.login("nobody", "hunter22!").await;

    for resp in [&wrong_password, &unknown_user] {
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(resp), Some("/login?error=Invalid+credentials"));
        assert!(set_cookie(resp, "access_token").is_none());
    }
}

#[tokio::test]
async fn test_login_page_shows_messages() {
    let app = spawn().await;

    let resp = app.get("/login?error=Invalid+credentials").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Invalid credentials"));

    let resp = app
        .get("/login?success=Account+created+successfully.+Please+log+in.")
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"<p class="alert alert-success">Account created successfully. Please log in.</p>"#));
    assert!(!body.contains("alert-error"));
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_dashboard_rejects_forged_cookie() {
    let app = spawn().await;

    let resp = app
        .client
        .get(app.url("/dashboard"))
        .header("cookie", "access_token=not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login?error=Please%20log%20in"));
}

#[tokio::test]
async fn test_expired_session_asks_to_log_in_again() {
    let app = spawn().await;
    app.signup("jane", "jane@example.com", "hunter22!").await;

    let tokens = TokenService::new(&SecretString::from(TOKEN_SECRET), Duration::minutes(30));
    let expired = tokens
        .create_access_token("jane", Duration::seconds(-60))
        .unwrap();

    let resp = browser()
        .get(app.url("/dashboard"))
        .header("cookie", format!("access_token={expired}"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        Some("/login?error=Session%20expired.%20Please%20log%20in%20again")
    );
}

#[tokio::test]
async fn test_session_from_another_secret_is_rejected() {
    let app = spawn().await;
    app.signup("jane", "jane@example.com", "hunter22!").await;

    let other = TestApp::spawn_with_config(
        test_config(&[("DASHBOARD_TOKEN_SECRET", "zZ9&qQ1!wW8@eE7#rR6$tT5%yY4^uU3*")]),
        Arc::new(ScriptedGenerator::replying(CANONICAL_REPLY)),
    )
    .await;
    other.signup("jane", "jane@example.com", "hunter22!").await;

    let token_resp = app.login("jane", "hunter22!").await;
    let cookie = set_cookie(&token_resp, "access_token").unwrap();
    let pair = cookie.split(';').next().unwrap();

    let resp = browser()
        .get(other.url("/dashboard"))
        .header("cookie", pair)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_landing_reflects_identity() {
    let app = spawn().await;

    let anonymous = app.get("/").await.text().await.unwrap();
    assert!(!anonymous.contains("Log out"));

    app.signup("jane", "jane@example.com", "hunter22!").await;
    app.login("jane", "hunter22!").await;

    let signed_in = app.get("/").await.text().await.unwrap();
    assert!(signed_in.contains("Log out (jane)"));
}

#[tokio::test]
async fn test_landing_alias_redirects() {
    let app = spawn().await;

    let resp = app.get("/landing").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

/// Store whose backing database is gone.
struct UnreachableStore;

#[async_trait]
impl UserStore for UnreachableStore {
    async fn insert(&self, _user: NewUser) -> Result<User, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_password_hash(
        &self,
        _username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

#[tokio::test]
async fn test_readiness_fails_when_store_is_down() {
    let addr = serve(AppState::new(
        test_config(&[]),
        Arc::new(UnreachableStore),
        Arc::new(ScriptedGenerator::replying(CANONICAL_REPLY)),
    ))
    .await;
    let client = browser();

    let resp = client
        .get(format!("http://{addr}/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_static_assets() {
    let app = spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = app.get("/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get("/static/js/dashboard.js").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
