//! Deadline and date normalization for Reclaim MCP server
//!
//! Tool callers express deadlines three ways: a day count from now, a full
//! ISO-8601 datetime, or a bare `YYYY-MM-DD` date. The upstream API wants a
//! single UTC timestamp in the `due` field. This module converts between
//! the two, degrading to a sensible default instead of erroring — the
//! deadline is a cosmetic scheduling hint, so availability wins over
//! strictness here.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Flexible deadline input accepted by the create/update tools.
#[derive(Debug, Clone, PartialEq)]
pub enum DeadlineInput {
    /// Number of days from now (non-positive means "now")
    Days(i64),
    /// ISO-8601 datetime or `YYYY-MM-DD` date
    Text(String),
}

/// Normalize a flexible deadline input into a UTC timestamp.
///
/// # Arguments
/// * `input` - Day count, datetime string, bare date string, or absent
///
/// # Returns
/// A UTC timestamp. Resolution rules, in order:
/// - `Days(n)` with `n <= 0`: the current instant (never projected into
///   the past, never silently clamped up to one day)
/// - `Days(n)` with `n > 0`: now plus `n` days, time of day preserved
///   (counts too large to represent fall back to the default below)
/// - `Text` parsing as RFC 3339: that exact instant, converted to UTC
/// - `Text` matching `YYYY-MM-DD` strictly: midnight UTC of that date
/// - Anything else (absent, garbage text): now plus one day
///
/// This function has no failure path.
pub fn normalize_deadline(input: Option<&DeadlineInput>) -> DateTime<Utc> {
    normalize_deadline_at(input, Utc::now())
}

/// As [`normalize_deadline`], with an explicit "now" for deterministic tests.
pub fn normalize_deadline_at(input: Option<&DeadlineInput>, now: DateTime<Utc>) -> DateTime<Utc> {
    match input {
        Some(DeadlineInput::Days(n)) => {
            if *n <= 0 {
                now
            } else {
                // Day counts beyond chrono's representable range degrade to
                // the default instead of panicking.
                Duration::try_days(*n)
                    .and_then(|days| now.checked_add_signed(days))
                    .unwrap_or_else(|| default_deadline(now))
            }
        }
        Some(DeadlineInput::Text(text)) => parse_datetime_text(text).unwrap_or_else(|| default_deadline(now)),
        None => default_deadline(now),
    }
}

/// Parse a datetime string: RFC 3339 first, then strict `YYYY-MM-DD`.
fn parse_datetime_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_time(NaiveTime::MIN),
        Utc,
    ))
}

/// Default deadline: 24 hours from now.
fn default_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(1)
}

/// Coerce a bare-date deadline input to the end of that day (23:59:59 UTC).
///
/// `logWork`'s optional `end` parameter accepts the same flexible inputs as
/// a deadline, but a bare `YYYY-MM-DD` should cover the whole day rather
/// than cut off the logged interval at midnight. Inputs that carried a time
/// component pass through unchanged.
pub fn end_of_day_if_bare_date(input: &DeadlineInput, normalized: DateTime<Utc>) -> DateTime<Utc> {
    let DeadlineInput::Text(text) = input else {
        return normalized;
    };
    if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
        return normalized;
    }
    let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    DateTime::from_naive_utc_and_offset(normalized.date_naive().and_time(end), Utc)
}
