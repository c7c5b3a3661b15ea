//! Timestamp normalization.
//!
//! Every source encoding ends up as one canonical `DateTime<Utc>`. Display
//! code re-projects that instant into a fixed zone with [`project`].

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// The three timestamp encodings found in the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTimestamp<'a> {
    /// ISO-8601 with an explicit zone or a trailing `Z`.
    Zoned(&'a str),
    /// ISO-8601 read as UTC, plus a separate "local = UTC + offset" field
    /// in minutes that is subtracted from it.
    WithOffset(&'a str, i32),
    /// Wall-clock text without zone, read in the reference zone.
    Naive(&'a str),
}

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y:%m:%d %H:%M:%S%:z",
];

/// Normalize an optional raw timestamp. A missing input stays missing: it
/// is never replaced by the current time.
pub fn normalize(
    raw: Option<RawTimestamp<'_>>,
    reference: &FixedOffset,
) -> AppResult<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(RawTimestamp::Zoned(s)) => parse_zoned(s).map(Some),
        Some(RawTimestamp::WithOffset(s, minutes)) => parse_with_offset(s, minutes).map(Some),
        Some(RawTimestamp::Naive(s)) => parse_naive(s, reference).map(Some),
    }
}

/// ISO-8601 with an explicit zone. `Z` means UTC; a space is accepted
/// between date and time.
pub fn parse_zoned(s: &str) -> AppResult<DateTime<Utc>> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(t, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    // "YYYY-MM-DD HH:MM:SSZ"
    if let Some(body) = t.strip_suffix('Z').or_else(|| t.strip_suffix('z'))
        && let Some(naive) = parse_naive_text(body)
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(AppError::MalformedTimestamp(format!(
        "'{s}' is not a zoned ISO-8601 timestamp"
    )))
}

/// Read the text as UTC (an explicit zone is honoured as an absolute
/// instant), then subtract `offset_minutes`.
pub fn parse_with_offset(s: &str, offset_minutes: i32) -> AppResult<DateTime<Utc>> {
    let as_utc = match parse_zoned(s) {
        Ok(dt) => dt,
        Err(_) => parse_naive_text(s)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| {
                AppError::MalformedTimestamp(format!("'{s}' is not an ISO-8601 timestamp"))
            })?,
    };
    Ok(as_utc - Duration::minutes(i64::from(offset_minutes)))
}

/// Wall-clock text interpreted in `reference`, converted to UTC.
pub fn parse_naive(s: &str, reference: &FixedOffset) -> AppResult<DateTime<Utc>> {
    let naive = parse_naive_text(s).ok_or_else(|| {
        AppError::MalformedTimestamp(format!("'{s}' is not a local date-time"))
    })?;
    reference
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::MalformedTimestamp(format!("'{s}' is ambiguous")))
}

/// User-typed time: honoured as an instant when it carries a zone, read as
/// wall-clock time in `reference` otherwise.
pub fn parse_flexible(s: &str, reference: &FixedOffset) -> AppResult<DateTime<Utc>> {
    parse_zoned(s).or_else(|_| parse_naive(s, reference))
}

fn parse_naive_text(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
}

/// Re-project a canonical instant into the display zone.
pub fn project(instant: &DateTime<Utc>, display: &FixedOffset) -> DateTime<FixedOffset> {
    instant.with_timezone(display)
}

/// Inverse of [`project`]: back to the canonical UTC instant.
pub fn canonical<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}
