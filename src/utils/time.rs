//! Time utilities: UTC offset parsing, canonical key text, display formatting.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Parse a UTC offset written as `+09:00`, `-0530`, `+9`, `Z` or `UTC`.
pub fn parse_utc_offset(s: &str) -> AppResult<FixedOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::Config(s.to_string()));
    }

    let invalid = || AppError::Config(format!("invalid UTC offset '{s}' (expected e.g. +09:00)"));
    if !t.is_ascii() {
        return Err(invalid());
    }

    let (sign, rest) = match t.chars().next() {
        Some('+') => (1, &t[1..]),
        Some('-') => (-1, &t[1..]),
        _ => return Err(invalid()),
    };

    let (h, m) = if let Some((h, m)) = rest.split_once(':') {
        (h, m)
    } else if rest.len() == 4 {
        rest.split_at(2)
    } else {
        (rest, "0")
    };

    let hours: i32 = h.parse().map_err(|_| invalid())?;
    let minutes: i32 = m.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Canonical text of an instant: RFC 3339, UTC, millisecond precision, `Z`.
/// Used as the stored key, so it must never change shape.
pub fn canonical_text(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Human-facing text of an instant in the display zone.
pub fn display_text(dt: &DateTime<Utc>, zone: &FixedOffset) -> String {
    dt.with_timezone(zone).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Display text for optional instants; unknown times render as `-`.
pub fn display_opt(dt: Option<&DateTime<Utc>>, zone: &FixedOffset) -> String {
    dt.map(|d| display_text(d, zone))
        .unwrap_or_else(|| "-".to_string())
}
