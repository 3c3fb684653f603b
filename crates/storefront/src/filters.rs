//! Custom Askama template filters.

use std::fmt::Display;

/// Characters of an id shown in compact listings.
const SHORT_ID_LEN: usize = 8;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Leading characters of a record id, enough to tell rows apart.
///
/// Usage in templates: `{{ row.id|short_id }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_id(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(shorten(&value.to_string()))
}

fn shorten(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}
