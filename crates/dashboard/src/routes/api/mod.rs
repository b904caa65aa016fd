//! JSON API routes.

pub mod campaign;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the API router, nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/campaign-suggestion", get(campaign::campaign_suggestion))
}
