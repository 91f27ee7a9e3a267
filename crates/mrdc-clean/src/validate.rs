//! Row-level validity predicates used by the cleaners.

use std::sync::OnceLock;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::context::AgePolicy;

fn uuid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("hardcoded pattern")
    })
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d\d:\d\d:\d\d$").expect("hardcoded pattern"))
}

/// Hyphenated UUID in 8-4-4-4-12 form, either case. The whole value must
/// match.
pub(crate) fn is_uuid(value: &str) -> bool {
    uuid_re().is_match(value.trim())
}

pub(crate) fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Two-digit `hh:mm:ss` shape. Single-digit components must be zero-padded
/// before this check.
pub(crate) fn is_timestamp(value: &str) -> bool {
    timestamp_re().is_match(value.trim())
}

fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years * 12))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Age window predicate for the user filter.
///
/// `Permissive` reproduces the historical OR of the two bounds and passes
/// every parseable date of birth. `Bounded` requires the user to be at
/// least 16 and at most 120 years old at `now`.
pub(crate) fn keep_for_age(dob: NaiveDate, now: NaiveDateTime, policy: AgePolicy) -> bool {
    let at_least_16 = add_years(dob, 16).is_some_and(|d| midnight(d) < now);
    let at_most_120 = add_years(dob, 120).is_none_or(|d| midnight(d) > now);
    match policy {
        AgePolicy::Permissive => at_least_16 || at_most_120,
        AgePolicy::Bounded => at_least_16 && at_most_120,
    }
}

/// True when the membership date is on or after the birth date and not in
/// the future.
pub(crate) fn join_order_valid(dob: NaiveDate, join: NaiveDate, now: NaiveDateTime) -> bool {
    dob <= join && midnight(join) <= now
}

/// True when `value` lies strictly inside `(-limit, limit)`.
pub(crate) fn in_open_range(value: f64, limit: f64) -> bool {
    value > -limit && value < limit
}
