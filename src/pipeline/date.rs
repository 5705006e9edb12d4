//! Date normalization for the DATA field.
//!
//! The DATA column arrives as whatever the upstream export produced: native
//! spreadsheet dates, ISO strings, pre-formatted Brazilian dates, or free
//! text like `N/A`. The label always shows zero-padded `DD/MM/YYYY` when a
//! date can be recognised, and the raw text verbatim otherwise. Falling back
//! is not an error — one odd cell must not abort a batch of labels — but it
//! is reported, both as a `warn!` and in the run summary.

use crate::manifest::DateValue;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Display format for every label's DATA field.
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Date-only layouts tried against text cells, in order.
///
/// Day-first layouts come first so a value already in display form
/// round-trips unchanged instead of having its day and month swapped.
/// The US layout sits last, catching only dates nothing else matched
/// (an unambiguous `03/25/2024` still normalizes rather than falling back).
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%m/%d/%Y",
];

/// Datetime layouts tried after the date-only ones; the time part is dropped.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Outcome of normalizing one DATA value.
///
/// Both variants carry the exact string the label will show. The distinction
/// exists so summaries and logs can flag rows whose date passed through
/// unparsed without treating them as failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDate {
    /// The value was recognised; the string is the `DD/MM/YYYY` form.
    Parsed(String),
    /// The value was not recognised; the string is the input, unchanged.
    Fallback(String),
}

impl NormalizedDate {
    /// The text the label's DATA row shows.
    pub fn display(&self) -> &str {
        match self {
            NormalizedDate::Parsed(s) | NormalizedDate::Fallback(s) => s,
        }
    }

    /// True when the raw value passed through unparsed.
    pub fn is_fallback(&self) -> bool {
        matches!(self, NormalizedDate::Fallback(_))
    }
}

/// Normalize one DATA cell to its label display form.
///
/// Native timestamps format directly. Text is trimmed and tried against
/// [`DATE_FORMATS`], then [`DATETIME_FORMATS`], then RFC 3339; the first hit
/// wins. Unrecognised text comes back [`NormalizedDate::Fallback`] with the
/// original string untouched.
pub fn normalize(value: &DateValue) -> NormalizedDate {
    match value {
        DateValue::Timestamp(ts) => NormalizedDate::Parsed(ts.format(DISPLAY_FORMAT).to_string()),
        DateValue::Text(raw) => normalize_text(raw),
    }
}

fn normalize_text(raw: &str) -> NormalizedDate {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NormalizedDate::Fallback(raw.to_string());
    }
    match parse_text_date(trimmed) {
        Some(date) => NormalizedDate::Parsed(date.format(DISPLAY_FORMAT).to_string()),
        None => NormalizedDate::Fallback(raw.to_string()),
    }
}

fn parse_text_date(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Some(date) = NaiveDate::parse_from_str(s, fmt).ok().and_then(plausible) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Some(date) = NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .map(|dt| dt.date())
            .and_then(plausible)
        {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
        .and_then(plausible)
}

/// chrono's `%Y` happily reads `24` as the year 24. Exports write four-digit
/// years, so anything ancient is a misread two-digit year; showing the raw
/// cell beats printing `05/03/0024` on a label.
fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= 1000).then_some(date)
}
