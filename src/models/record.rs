use super::record_kind::{RecordKind, RecordSource};
use crate::errors::{AppError, AppResult};
use crate::utils::time::canonical_text;
use chrono::{DateTime, Utc};

/// A decoded position in signed decimal degrees.
///
/// Latitude and longitude only ever travel together, so a record either has
/// a `GeoPoint` or it has none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::MalformedCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::MalformedCoordinate(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Segment-level time context shared by every record a segment produces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeSpan {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisitDetails {
    pub probability: Option<f64>,
    pub place_id: Option<String>,
    pub semantic_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityDetails {
    pub distance_meters: Option<f64>,
    pub activity_type: Option<String>,
    pub probability: Option<f64>,
}

/// Which end of an activity a record marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEdge {
    Start,
    End,
}

impl ActivityEdge {
    pub fn kind(&self) -> RecordKind {
        match self {
            ActivityEdge::Start => RecordKind::ActivityStart,
            ActivityEdge::End => RecordKind::ActivityEnd,
        }
    }
}

/// Storage identity of a record: owner, kind and the one timestamp that
/// kind is keyed on (`point_time` for path points, `start_time` otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub owner: String,
    pub kind: RecordKind,
    pub timestamp: DateTime<Utc>,
}

impl NaturalKey {
    /// Text form of the timestamp as stored in `locations.key_time`.
    pub fn timestamp_text(&self) -> String {
        canonical_text(&self.timestamp)
    }
}

/// The canonical unit produced by every extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub kind: RecordKind,
    pub owner: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub point_time: Option<DateTime<Utc>>,
    pub position: Option<GeoPoint>,
    pub visit: Option<VisitDetails>,
    pub activity: Option<ActivityDetails>,
    pub comment: String,
    pub source: RecordSource,
}

impl LocationRecord {
    /// A single timestamped observation (timeline path entry, photo, manual fix).
    pub fn path_point(
        owner: &str,
        point_time: Option<DateTime<Utc>>,
        position: Option<GeoPoint>,
        source: RecordSource,
    ) -> Self {
        Self {
            kind: RecordKind::PathPoint,
            owner: owner.to_string(),
            start_time: None,
            end_time: None,
            point_time,
            position,
            visit: None,
            activity: None,
            comment: String::new(),
            source,
        }
    }

    pub fn visit(
        owner: &str,
        span: TimeSpan,
        position: Option<GeoPoint>,
        details: VisitDetails,
    ) -> Self {
        Self {
            kind: RecordKind::Visit,
            owner: owner.to_string(),
            start_time: span.start,
            end_time: span.end,
            point_time: None,
            position,
            visit: Some(details),
            activity: None,
            comment: String::new(),
            source: RecordSource::Timeline,
        }
    }

    pub fn activity_endpoint(
        owner: &str,
        edge: ActivityEdge,
        span: TimeSpan,
        position: Option<GeoPoint>,
        details: ActivityDetails,
    ) -> Self {
        Self {
            kind: edge.kind(),
            owner: owner.to_string(),
            start_time: span.start,
            end_time: span.end,
            point_time: None,
            position,
            visit: None,
            activity: Some(details),
            comment: String::new(),
            source: RecordSource::Timeline,
        }
    }

    /// Attach the enclosing segment's span to a path point (context only,
    /// the key stays on `point_time`).
    pub fn with_span(mut self, span: TimeSpan) -> Self {
        self.start_time = span.start;
        self.end_time = span.end;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.longitude)
    }

    /// The timestamp this record is keyed on.
    pub fn key_time(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            RecordKind::PathPoint => self.point_time,
            _ => self.start_time,
        }
    }

    /// `None` when the key timestamp is unknown: such a record cannot be
    /// stored without risking a collision with an unrelated row.
    pub fn natural_key(&self) -> Option<NaturalKey> {
        self.key_time().map(|timestamp| NaturalKey {
            owner: self.owner.clone(),
            kind: self.kind,
            timestamp,
        })
    }
}
