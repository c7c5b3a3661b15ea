use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of observation a location record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    PathPoint,
    Visit,
    ActivityStart,
    ActivityEnd,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::PathPoint,
        RecordKind::Visit,
        RecordKind::ActivityStart,
        RecordKind::ActivityEnd,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordKind::PathPoint => "path_point",
            RecordKind::Visit => "visit",
            RecordKind::ActivityStart => "activity_start",
            RecordKind::ActivityEnd => "activity_end",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "path_point" => Some(RecordKind::PathPoint),
            "visit" => Some(RecordKind::Visit),
            "activity_start" => Some(RecordKind::ActivityStart),
            "activity_end" => Some(RecordKind::ActivityEnd),
            _ => None,
        }
    }

    /// Lenient parser for CLI and CSV input. Also understands the labels
    /// written by the older spreadsheet converter (`timelinePath`, ...).
    pub fn from_label(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        match norm.as_str() {
            "timelinepath" | "path" | "point" => Some(RecordKind::PathPoint),
            other => RecordKind::from_db_str(other),
        }
    }

    pub fn is_activity(&self) -> bool {
        matches!(self, RecordKind::ActivityStart | RecordKind::ActivityEnd)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Where a record came from. Kept for provenance only, never part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Timeline,
    Photo,
    Manual,
    Csv,
}

impl RecordSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecordSource::Timeline => "timeline",
            RecordSource::Photo => "photo",
            RecordSource::Manual => "manual",
            RecordSource::Csv => "csv",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "timeline" => Some(RecordSource::Timeline),
            "photo" => Some(RecordSource::Photo),
            "manual" => Some(RecordSource::Manual),
            "csv" => Some(RecordSource::Csv),
            _ => None,
        }
    }
}
