// src/export/model.rs

use crate::core::timestamp::{parse_flexible, project};
use crate::errors::{AppError, AppResult};
use crate::models::{
    ActivityDetails, GeoPoint, LocationRecord, RecordKind, RecordSource, VisitDetails,
};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Flat row used for CSV / JSON export and for CSV re-import.
///
/// The aliases accept the header names of the older spreadsheet converter
/// (`type`, `visit_placeId`, ...). Columns that converter never wrote
/// (`owner`, `comment`, `source`) are optional on input.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RecordExport {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub point_time: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub visit_probability: Option<f64>,
    #[serde(default, alias = "visit_placeId")]
    pub visit_place_id: Option<String>,
    #[serde(default, alias = "visit_semanticType")]
    pub visit_semantic_type: Option<String>,
    #[serde(default, alias = "activity_distanceMeters")]
    pub activity_distance_meters: Option<f64>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub activity_probability: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

fn zoned_text(dt: &Option<DateTime<Utc>>, zone: &FixedOffset) -> Option<String> {
    dt.as_ref()
        .map(|d| project(d, zone).to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

impl RecordExport {
    /// Project a stored record into the display zone.
    pub fn from_record(r: &LocationRecord, zone: &FixedOffset) -> Self {
        let visit = r.visit.clone().unwrap_or_default();
        let activity = r.activity.clone().unwrap_or_default();

        Self {
            kind: r.kind.to_db_str().to_string(),
            owner: Some(r.owner.clone()),
            start_time: zoned_text(&r.start_time, zone),
            end_time: zoned_text(&r.end_time, zone),
            point_time: zoned_text(&r.point_time, zone),
            latitude: r.latitude(),
            longitude: r.longitude(),
            visit_probability: visit.probability,
            visit_place_id: visit.place_id,
            visit_semantic_type: visit.semantic_type,
            activity_distance_meters: activity.distance_meters,
            activity_type: activity.activity_type,
            activity_probability: activity.probability,
            comment: Some(r.comment.clone()),
            source: Some(r.source.to_db_str().to_string()),
        }
    }

    /// The kind column, in either spelling.
    pub fn record_kind(&self) -> AppResult<RecordKind> {
        RecordKind::from_label(&self.kind)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown record kind '{}'", self.kind)))
    }

    /// Decode a zone-qualified time column; wall-clock text without a zone
    /// is read in `local_zone`.
    pub fn time(value: &Option<String>, local_zone: &FixedOffset) -> AppResult<Option<DateTime<Utc>>> {
        let Some(text) = value.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        parse_flexible(text, local_zone).map(Some)
    }

    /// Both halves of the coordinate or none.
    pub fn position(&self) -> AppResult<Option<GeoPoint>> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::MalformedCoordinate(
                "latitude and longitude must both be present".into(),
            )),
        }
    }

    pub fn visit_details(&self) -> VisitDetails {
        VisitDetails {
            probability: self.visit_probability,
            place_id: self.visit_place_id.clone(),
            semantic_type: self.visit_semantic_type.clone(),
        }
    }

    pub fn activity_details(&self) -> ActivityDetails {
        ActivityDetails {
            distance_meters: self.activity_distance_meters,
            activity_type: self.activity_type.clone(),
            probability: self.activity_probability,
        }
    }

    /// Provenance column; rows without one are attributed to the CSV import.
    pub fn record_source(&self) -> RecordSource {
        self.source
            .as_deref()
            .and_then(RecordSource::from_db_str)
            .unwrap_or(RecordSource::Csv)
    }
}
