//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the first whitespace-separated word, for informal greetings.
///
/// Usage in templates: `{{ user.full_name|first_name }}`
#[askama::filter_fn]
pub fn first_name(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let value = value.to_string();
    Ok(value.split_whitespace().next().unwrap_or_default().to_owned())
}
