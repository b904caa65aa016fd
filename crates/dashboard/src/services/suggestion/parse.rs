//! Extraction and normalization of model output.
//!
//! Models wrap their JSON in prose often enough that the payload is taken to
//! be everything from the first `{` to the last `}`. Two shapes are accepted:
//!
//! - canonical: `title`, `description`, `targeting`, `adText`
//! - split: `title`, `description`, `age_range`, `location`, `interests`, `adText`
//!
//! Both normalize to [`CampaignSuggestion`]; the split shape's components are
//! folded into a single targeting string and dropped.

use serde_json::{Map, Value};

use campaign_dashboard_core::CampaignSuggestion;

use super::{SuggestionError, Vocabulary};

const CANONICAL_FIELDS: [&str; 4] = ["title", "description", "targeting", "adText"];
const SPLIT_FIELDS: [&str; 6] = [
    "title",
    "description",
    "age_range",
    "location",
    "interests",
    "adText",
];
const SPLIT_ONLY_FIELDS: [&str; 3] = ["age_range", "location", "interests"];

/// Slice `text` from its first `{` through its last `}`.
///
/// # Errors
///
/// Returns `MalformedModelOutput` if either brace is missing or the last `}`
/// comes before the first `{`.
pub fn extract_json_object(text: &str) -> Result<&str, SuggestionError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(SuggestionError::MalformedModelOutput(
            "no JSON object in model output".to_string(),
        ));
    };

    text.get(start..=end).filter(|_| start < end).ok_or_else(|| {
        SuggestionError::MalformedModelOutput("braces out of order in model output".to_string())
    })
}

/// Parse raw model output into a normalized suggestion.
///
/// # Errors
///
/// Returns `MalformedModelOutput` if no JSON object can be parsed and
/// `IncompleteModelOutput` if neither schema's required fields are all present.
pub fn parse_suggestion(
    text: &str,
    vocabulary: &Vocabulary,
) -> Result<CampaignSuggestion, SuggestionError> {
    let json = extract_json_object(text)?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SuggestionError::MalformedModelOutput(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(SuggestionError::MalformedModelOutput(
            "model output is not a JSON object".to_string(),
        ));
    };

    let canonical_missing = missing_fields(&object, &CANONICAL_FIELDS);
    if canonical_missing.is_empty() {
        return Ok(CampaignSuggestion {
            title: text_field(&object, "title"),
            description: text_field(&object, "description"),
            targeting: text_field(&object, "targeting"),
            ad_text: text_field(&object, "adText"),
        });
    }

    let split_missing = missing_fields(&object, &SPLIT_FIELDS);
    if split_missing.is_empty() {
        return Ok(normalize_split(&object, vocabulary));
    }

    let looks_split = !object.contains_key("targeting")
        && SPLIT_ONLY_FIELDS.iter().any(|f| object.contains_key(*f));
    Err(SuggestionError::IncompleteModelOutput(if looks_split {
        split_missing
    } else {
        canonical_missing
    }))
}

fn missing_fields(object: &Map<String, Value>, required: &[&'static str]) -> Vec<&'static str> {
    required
        .iter()
        .copied()
        .filter(|field| {
            let value = object.get(*field);
            if *field == "interests" {
                value.and_then(interest_list).is_none()
            } else {
                !matches!(value, Some(Value::String(_)))
            }
        })
        .collect()
}

fn text_field(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// `interests` as a list of strings: a non-empty array of strings or a single string.
fn interest_list(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(Value::as_str).collect::<Option<Vec<_>>>()
        }
        _ => None,
    }
}

fn normalize_split(object: &Map<String, Value>, vocabulary: &Vocabulary) -> CampaignSuggestion {
    let age = text_field(object, "age_range");
    let location = text_field(object, "location");
    let interests = object
        .get("interests")
        .and_then(interest_list)
        .unwrap_or_default();

    if !vocabulary.has_location(&location) {
        tracing::warn!(%location, "model chose a location outside the vocabulary");
    }
    for interest in interests.iter().filter(|i| !vocabulary.has_interest(i)) {
        tracing::warn!(%interest, "model chose an interest outside the vocabulary");
    }
    if !(1..=3).contains(&interests.len()) {
        tracing::warn!(count = interests.len(), "model chose an unexpected number of interests");
    }

    CampaignSuggestion {
        title: text_field(object, "title"),
        description: text_field(object, "description"),
        targeting: format!(
            "Age: {age}, Location: {location}, Interests: {}",
            interests.join(", ")
        ),
        ad_text: text_field(object, "adText"),
    }
}
