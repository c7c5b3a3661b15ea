//! Serde types for the semantic timeline export.
//!
//! Only the segment header is decoded eagerly. `timelinePath` entries,
//! `visit` and `activity` stay as raw JSON until the extractor decodes them
//! one by one, so a single malformed sub-structure never poisons its segment.
//! Numeric fields stay raw as well and go through [`number`], so a bad
//! probability or offset only nulls that one field.

use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_time_timezone_utc_offset_minutes: Option<Value>,
    #[serde(default)]
    pub end_time_timezone_utc_offset_minutes: Option<Value>,
    pub timeline_path: Option<Vec<Value>>,
    pub visit: Option<Value>,
    pub activity: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawPathPoint {
    pub point: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVisit {
    #[serde(default)]
    pub probability: Option<Value>,
    pub top_candidate: Option<RawVisitCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVisitCandidate {
    pub place_id: Option<String>,
    pub semantic_type: Option<String>,
    pub place_location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLatLng {
    pub lat_lng: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
    pub start: Option<RawLatLng>,
    pub end: Option<RawLatLng>,
    #[serde(default)]
    pub distance_meters: Option<Value>,
    pub top_candidate: Option<RawActivityCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct RawActivityCandidate {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub probability: Option<Value>,
}

/// A JSON number, a numeric string or null. Older exports quote their
/// probabilities and distances.
pub fn number(value: Option<&Value>) -> AppResult<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| AppError::MalformedValue(format!("not a number: {s:?}"))),
        Some(other) => Err(AppError::MalformedValue(format!(
            "expected a number, found {other}"
        ))),
    }
}

/// Whole minutes east of UTC.
pub fn offset_minutes(value: Option<&Value>) -> AppResult<Option<i32>> {
    let invalid = || {
        AppError::MalformedTimestamp(format!(
            "UTC offset minutes: {}",
            value.map(Value::to_string).unwrap_or_default()
        ))
    };
    match number(value).map_err(|_| invalid())? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && v.abs() <= 24.0 * 60.0 => Ok(Some(v as i32)),
        Some(_) => Err(invalid()),
    }
}
