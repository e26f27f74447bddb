//! Custom Askama template filters and formatting helpers.

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

/// Format a server-reported amount as a price string.
///
/// The storefront never computes amounts; this only renders what the
/// backend returned.
#[must_use]
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}
