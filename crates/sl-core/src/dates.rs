//! Permissive date parsing
//!
//! Hand-maintained exports mix ISO dates, US-style slashes and spelled-out
//! month names. [`parse_date`] accepts all of these and reduces them to a
//! calendar date; [`normalize_date`] renders the result as `YYYY-MM-DD`.

use crate::value::Value;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical output format
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Date-only layouts, tried in order. Month-first wins over day-first for
/// ambiguous slash dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%A, %B %d, %Y",
    "%A %B %d, %Y",
    "%a, %b %d, %Y",
    "%A, %d %B %Y",
];

/// Date-time layouts; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static ORDINAL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid regex"));

/// Parse a free-form date string into a calendar date.
///
/// Returns `None` for blank input and for anything that is not a real
/// calendar date (e.g. `2024-02-30`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }
    let cleaned = ORDINAL_SUFFIX.replace_all(&cleaned, "$1");
    let s = cleaned.as_ref();

    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s[0..4].parse().ok()?;
        let month = s[4..6].parse().ok()?;
        let day = s[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            // "%Y" happily reads "24" as year 24; leave that to the "%y" layouts.
            if format.contains("%Y") && date.year() < 1000 {
                continue;
            }
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Normalize a cell to a `YYYY-MM-DD` string.
///
/// Integers are read as compact `YYYYMMDD` dates; floats never parse.
pub fn normalize_date(value: &Value) -> Option<String> {
    let date = match value {
        Value::Text(s) => parse_date(s)?,
        Value::Int(i) => parse_date(&i.to_string())?,
        Value::Float(_) | Value::Null => return None,
    };
    Some(date.format(ISO_DATE).to_string())
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;
