//! Coordinate decoding: DMS triples and `"lat°, lon°"` strings to signed
//! decimal degrees.
//!
//! Every failure here is `MalformedCoordinate`; callers treat it as
//! "coordinate unknown" for one record and keep going.

use crate::errors::{AppError, AppResult};
use crate::models::GeoPoint;
use regex::Regex;
use std::sync::LazyLock;

static SIGNED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*°?\s*,\s*([+-]?\d+(?:\.\d+)?)\s*°?\s*$")
        .expect("coordinate pair pattern is valid")
});

/// `degrees + minutes/60 + seconds/3600`, negated for the S and W hemispheres.
pub fn decode_dms(degrees: f64, minutes: f64, seconds: f64, hemisphere: &str) -> AppResult<f64> {
    for (label, v) in [("degrees", degrees), ("minutes", minutes), ("seconds", seconds)] {
        if !v.is_finite() {
            return Err(AppError::MalformedCoordinate(format!(
                "{label} component is not a number: {v}"
            )));
        }
    }

    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;

    match hemisphere.trim().to_ascii_uppercase().as_str() {
        "N" | "E" => Ok(magnitude),
        "S" | "W" => Ok(-magnitude),
        other => Err(AppError::MalformedCoordinate(format!(
            "unknown hemisphere reference '{other}'"
        ))),
    }
}

/// EXIF form of [`decode_dms`]: exactly three unsigned rationals.
pub fn decode_dms_rationals(parts: &[exif::Rational], hemisphere: &str) -> AppResult<f64> {
    let [d, m, s] = parts else {
        return Err(AppError::MalformedCoordinate(format!(
            "expected 3 DMS components, found {}",
            parts.len()
        )));
    };

    let value = |r: &exif::Rational| {
        if r.denom == 0 {
            f64::NAN
        } else {
            r.to_f64()
        }
    };

    decode_dms(value(d), value(m), value(s), hemisphere)
}

/// Parse `"<lat>°, <lon>°"` (degree signs optional) into `(lat, lon)`.
pub fn decode_signed_pair(text: &str) -> AppResult<(f64, f64)> {
    let caps = SIGNED_PAIR
        .captures(text)
        .ok_or_else(|| AppError::MalformedCoordinate(format!("cannot parse '{text}'")))?;

    let parse = |i: usize| {
        caps[i]
            .parse::<f64>()
            .map_err(|_| AppError::MalformedCoordinate(format!("cannot parse '{text}'")))
    };

    let point = GeoPoint::new(parse(1)?, parse(2)?)?;
    Ok((point.latitude, point.longitude))
}

/// [`decode_signed_pair`] straight into a [`GeoPoint`].
pub fn decode_point(text: &str) -> AppResult<GeoPoint> {
    let (lat, lon) = decode_signed_pair(text)?;
    GeoPoint::new(lat, lon)
}
