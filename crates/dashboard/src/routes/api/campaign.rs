//! Campaign suggestion endpoint.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use campaign_dashboard_core::CampaignSuggestion;

use crate::error::AppError;
use crate::middleware::OptionalUser;
use crate::services::suggestion::SuggestionError;
use crate::state::AppState;

/// Query parameters for a suggestion request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SuggestionQuery {
    /// Free-text hint about the business, passed to the model verbatim.
    pub business_type: Option<String>,
}

impl SuggestionQuery {
    /// Build from raw query pairs. A repeated `business_type` keeps the last
    /// value and unknown keys are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            business_type: pairs
                .into_iter()
                .rev()
                .find_map(|(key, value)| (key == "business_type").then_some(value)),
        }
    }
}

/// Generate a campaign suggestion.
///
/// Authentication is optional: a missing or unusable session cookie is
/// treated as an anonymous request. Every failure, including an unreadable
/// query string, becomes a 500 with a fixed body.
pub async fn campaign_suggestion(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<CampaignSuggestion>, AppError> {
    let Query(pairs) = query.map_err(|e| SuggestionError::InvalidRequest(e.body_text()))?;
    let query = SuggestionQuery::from_pairs(pairs);

    let business_type = query.business_type.as_deref();
    tracing::info!(
        business_type = business_type.unwrap_or("Not specified"),
        user = user.as_ref().map(|u| u.username.as_str()),
        "campaign suggestion requested"
    );

    let suggestion = state.suggestions().request_suggestion(business_type).await?;
    Ok(Json(suggestion))
}
