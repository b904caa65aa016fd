//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Landing page
//! GET  /landing                 - Redirect to /
//! GET  /dashboard               - Dashboard (requires auth)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (credential store)
//!
//! # Auth
//! GET  /login                   - Login page (?success= / ?error= hints)
//! POST /token                   - Login action, sets the access_token cookie
//! GET  /signup                  - Signup page
//! POST /signup                  - Signup action
//! GET  /logout                  - Clear cookie, redirect to /
//!
//! # API
//! GET  /api/campaign-suggestion - AI campaign suggestion (?business_type=, optional auth)
//!
//! # Static
//! GET  /static/*                - Files from the configured static directory
//! ```

pub mod api;
pub mod auth;
pub mod health;
pub mod pages;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::security_headers_middleware;
use crate::state::AppState;

/// Page, auth and API routes, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::landing))
        .route("/landing", get(pages::landing_redirect))
        .route("/dashboard", get(pages::dashboard))
        .route("/login", get(auth::login_page))
        .route("/token", post(auth::token))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout))
        .nest("/api", api::routes())
}

/// Build the complete application: routes, static files and middleware.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        user.username = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
