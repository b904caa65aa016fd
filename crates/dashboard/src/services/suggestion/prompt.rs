//! Prompt rendering.

use super::Vocabulary;

/// Render the instruction prompt for one suggestion request.
///
/// The output depends only on the vocabulary and the hint. A hint is appended
/// verbatim; `None` and an empty hint render the same prompt.
#[must_use]
pub fn build_prompt(vocabulary: &Vocabulary, business_type: Option<&str>) -> String {
    let interests = vocabulary.interests().join(", ");
    let locations = vocabulary.locations().join(", ");

    let mut prompt = format!(
        r#"
You are an expert marketing strategist.

Create a JSON response ONLY with these fields:
- title
- description
- targeting (format: "Age: X-Y, Location: [City], Interests: [Interest1, Interest2]")
- adText

Rules:
1. Only choose 1-3 interests from this list: {interests}
2. Choose ONE location from this list: {locations}
3. Response MUST be valid JSON only, with no explanations.

"#
    );

    if let Some(hint) = business_type.filter(|hint| !hint.is_empty()) {
        prompt.push_str("\nBusiness Type: ");
        prompt.push_str(hint);
        prompt.push('\n');
    }

    prompt
}
