//! Date and datetime parsing for the mixed formats found in the raw
//! sources.
//!
//! Cleaned frames carry dates as ISO 8601 strings (`YYYY-MM-DD`, or
//! `YYYY-MM-DD hh:mm:ss` for event datetimes). Raw values arrive in a
//! handful of layouts, so parsing tries a fixed format list in order and
//! the first hit wins. Card expiry values stay in their source `MM/YY`
//! form because a month/year pair is not a calendar date; they are parsed
//! here only to prove validity.

use chrono::{NaiveDate, NaiveDateTime};

/// Storage format for date columns in cleaned frames.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Storage format for the event `datetime` column.
pub const ISO_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Layouts accepted for mixed-format date columns, tried in order. The ISO
/// form leads so that already-clean output parses on the first attempt.
pub const MIXED_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%Y %B %d",
    "%d %B %Y",
    "%B %Y %d",
    "%Y %b %d",
    "%d %b %Y",
];

/// Parses a date in any of the [`MIXED_DATE_FORMATS`]. Returns `None` when
/// no layout matches the whole trimmed value.
pub fn parse_mixed_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    MIXED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parses a card expiry in `MM/YY` form into the first day of that month.
/// Two-digit years are taken as 2000-2099.
pub fn parse_month_year(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let (month, year) = trimmed.split_once('/')?;
    if month.is_empty() || month.len() > 2 || year.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, 1)
}

/// Parses an assembled event stamp in `YYYYMMDD hh:mm:ss` form.
pub fn parse_compact_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y%m%d %H:%M:%S").ok()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn iso_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(ISO_DATETIME).to_string()
}
