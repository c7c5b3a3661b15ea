//! Unified application error type.
//! Record-level parse failures (coordinates, timestamps, photo metadata,
//! numeric detail fields) are absorbed by the extractors; everything else
//! propagates to the caller.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    // ---------------------------
    // Record-level parsing errors (absorbed into null fields)
    // ---------------------------
    #[error("Malformed coordinate: {0}")]
    MalformedCoordinate(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Image metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Malformed value: {0}")]
    MalformedValue(String),

    // ---------------------------
    // Input-level errors (fatal for the whole call)
    // ---------------------------
    #[error("Missing structure in export: {0}")]
    MissingStructure(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for errors that only invalidate a single field of a single
    /// record. Extractors turn these into nulls and keep going.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            AppError::MalformedCoordinate(_)
                | AppError::MalformedTimestamp(_)
                | AppError::MetadataUnavailable(_)
                | AppError::MalformedValue(_)
        )
    }

    pub(crate) fn store<E: std::fmt::Display>(e: E) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
