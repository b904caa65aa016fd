//! Campaign suggestion response contract.

use serde::{Deserialize, Serialize};

/// A normalized ad-campaign suggestion.
///
/// This is the only shape ever returned to API callers: exactly four string
/// fields, all present. `ad_text` is serialized as `adText` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignSuggestion {
    /// Short campaign title.
    pub title: String,
    /// One or two sentence description of the campaign idea.
    pub description: String,
    /// Combined targeting string, e.g. `Age: 18-35, Location: Austin, Interests: Fitness`.
    pub targeting: String,
    /// Ad copy.
    #[serde(rename = "adText")]
    pub ad_text: String,
}
