use crate::db::pool::DbPool;
use crate::db::queries::load_records;
use crate::errors::AppResult;
use crate::models::{LocationRecord, RecordKind};
use crate::ui::messages::{header, warning};
use crate::utils::colors::color_for_kind;
use crate::utils::table::{Column, Table};
use crate::utils::time::display_opt;
use chrono::FixedOffset;

/// Listing of one owner's stored records.
pub struct ListLogic;

fn fmt_coord(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_else(|| "-".into())
}

/// Place or activity label shown next to the coordinates.
fn label(r: &LocationRecord) -> String {
    if let Some(v) = &r.visit {
        return v.semantic_type.clone().unwrap_or_else(|| "-".into());
    }
    if let Some(a) = &r.activity {
        return a.activity_type.clone().unwrap_or_else(|| "-".into());
    }
    "-".into()
}

impl ListLogic {
    pub fn build_table(records: &[LocationRecord], zone: &FixedOffset) -> Table {
        let mut table = Table::new(vec![
            Column::new("KIND"),
            Column::new("TIME"),
            Column::new("END"),
            Column::new("LAT"),
            Column::new("LON"),
            Column::new("LABEL"),
            Column::new("SOURCE"),
            Column::new("COMMENT"),
        ]);

        for r in records {
            table.add_colored_row(
                vec![
                    r.kind.to_string(),
                    display_opt(r.key_time().as_ref(), zone),
                    display_opt(r.end_time.as_ref(), zone),
                    fmt_coord(r.latitude()),
                    fmt_coord(r.longitude()),
                    label(r),
                    r.source.to_db_str().to_string(),
                    r.comment.clone(),
                ],
                color_for_kind(r.kind),
            );
        }
        table
    }

    pub fn print(
        pool: &mut DbPool,
        owner: &str,
        kind: Option<RecordKind>,
        limit: Option<usize>,
        zone: &FixedOffset,
    ) -> AppResult<usize> {
        let records = load_records(&pool.conn, Some(owner), kind, limit)?;

        if records.is_empty() {
            warning(format!("No records stored for '{owner}'."));
            return Ok(0);
        }

        header(format!("Records of '{owner}' (UTC{zone})"));
        print!("{}", Self::build_table(&records, zone).render());
        println!("\n{} record(s)", records.len());

        Ok(records.len())
    }
}
