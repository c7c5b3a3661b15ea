// src/export/csv_reader.rs

use crate::core::context::IngestContext;
use crate::core::report::Extraction;
use crate::errors::{AppError, AppResult};
use crate::export::RecordExport;
use crate::models::{ActivityEdge, LocationRecord, RecordKind, TimeSpan};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_csv_path(path: &Path, ctx: &IngestContext) -> AppResult<Extraction> {
    read_csv(File::open(path)?, ctx)
}

/// Rebuild records from an exported table.
///
/// Records are attached to `ctx.owner`; the `owner` column is informational.
/// Rows that do not deserialize or name an unknown kind are skipped, bad
/// times and coordinates are nulled.
pub fn read_csv<R: Read>(reader: R, ctx: &IngestContext) -> AppResult<Extraction> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h == "kind" || h == "type") {
        return Err(AppError::MissingStructure(
            "CSV header has no 'kind' (or 'type') column".into(),
        ));
    }

    let mut out = Extraction::default();

    for (i, row) in rdr.deserialize::<RecordExport>().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                out.skip(format!("line {line}"), AppError::Csv(e));
                continue;
            }
        };
        let kind = match row.record_kind() {
            Ok(k) => k,
            Err(e) => {
                out.skip(format!("line {line}"), e);
                continue;
            }
        };

        let record = row_to_record(&row, kind, line, ctx, &mut out);
        out.records.push(record);
    }

    Ok(out)
}

fn row_to_record(
    row: &RecordExport,
    kind: RecordKind,
    line: usize,
    ctx: &IngestContext,
    out: &mut Extraction,
) -> LocationRecord {
    let zone = &ctx.local_zone;
    let span = TimeSpan {
        start: out
            .absorb(RecordExport::time(&row.start_time, zone), || format!("line {line} start_time"))
            .flatten(),
        end: out
            .absorb(RecordExport::time(&row.end_time, zone), || format!("line {line} end_time"))
            .flatten(),
    };
    let position = out
        .absorb(row.position(), || format!("line {line} latitude/longitude"))
        .flatten();

    let mut record = match kind {
        RecordKind::PathPoint => {
            let point_time = out
                .absorb(RecordExport::time(&row.point_time, zone), || {
                    format!("line {line} point_time")
                })
                .flatten();
            LocationRecord::path_point(&ctx.owner, point_time, position, row.record_source())
                .with_span(span)
        }
        RecordKind::Visit => {
            LocationRecord::visit(&ctx.owner, span, position, row.visit_details())
        }
        RecordKind::ActivityStart | RecordKind::ActivityEnd => {
            let edge = if kind == RecordKind::ActivityStart {
                ActivityEdge::Start
            } else {
                ActivityEdge::End
            };
            LocationRecord::activity_endpoint(&ctx.owner, edge, span, position, row.activity_details())
        }
    };

    record.source = row.record_source();
    record.with_comment(row.comment.clone().unwrap_or_default())
}
