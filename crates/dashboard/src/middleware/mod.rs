//! HTTP middleware stack for the dashboard.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, error capture)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers
//!
//! Authentication is not a layer: handlers opt in with the
//! [`RequireUser`] or [`OptionalUser`] extractors.

pub mod auth;
pub mod security_headers;

pub use auth::{
    ACCESS_TOKEN_COOKIE, AuthRejection, OptionalUser, RequireUser, session_cookie,
    session_cookie_removal,
};
pub use security_headers::security_headers_middleware;
