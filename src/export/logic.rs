// src/export/logic.rs

use crate::db::log::plog;
use crate::db::pool::DbPool;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::RecordExport;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::ui::messages::warning;
use chrono::FixedOffset;
use std::path::Path;

/// High-level export of one owner's records.
pub struct ExportLogic;

impl ExportLogic {
    /// Write every record of `owner` to `file`, times in `zone`.
    /// Returns the number of rows written.
    pub fn export(
        pool: &mut DbPool,
        owner: &str,
        format: ExportFormat,
        file: &Path,
        zone: &FixedOffset,
        force: bool,
    ) -> AppResult<usize> {
        let rows: Vec<RecordExport> = load_records(&pool.conn, Some(owner), None, None)?
            .iter()
            .map(|r| RecordExport::from_record(r, zone))
            .collect();

        if rows.is_empty() {
            warning(format!("No records stored for '{owner}'; nothing exported."));
            return Ok(0);
        }

        ensure_writable(file, force)?;

        match format {
            ExportFormat::Csv => export_csv(&rows, file)?,
            ExportFormat::Json => export_json(&rows, file)?,
        }

        plog(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} records of '{owner}' to {}", rows.len(), file.display()),
        )?;

        Ok(rows.len())
    }
}
