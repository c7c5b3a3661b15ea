use crate::errors::AppError;
use crate::models::{
    ActivityDetails, GeoPoint, LocationRecord, NaturalKey, RecordKind, RecordSource, VisitDetails,
};
use crate::utils::time::canonical_text;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_COLUMNS: &str = "SELECT owner, kind, start_time, end_time, point_time, latitude, longitude,
        visit_probability, visit_place_id, visit_semantic_type,
        activity_distance_meters, activity_type, activity_probability,
        comment, source
     FROM locations";

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

fn time_column(row: &Row, name: &str, col: usize) -> Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(name)?;
    text.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                conversion_error(col, AppError::MalformedTimestamp(format!("{name} '{s}': {e}")))
            })
    })
    .transpose()
}

pub fn map_row(row: &Row) -> Result<LocationRecord> {
    let kind_str: String = row.get("kind")?;
    let kind = RecordKind::from_db_str(&kind_str).ok_or_else(|| {
        conversion_error(1, AppError::InvalidInput(format!("Invalid kind: {kind_str}")))
    })?;

    let source_str: String = row.get("source")?;
    let source = RecordSource::from_db_str(&source_str).ok_or_else(|| {
        conversion_error(14, AppError::InvalidInput(format!("Invalid source: {source_str}")))
    })?;

    let latitude: Option<f64> = row.get("latitude")?;
    let longitude: Option<f64> = row.get("longitude")?;
    let position = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon).map_err(|e| conversion_error(5, e))?),
        _ => None,
    };

    let visit = if kind == RecordKind::Visit {
        Some(VisitDetails {
            probability: row.get("visit_probability")?,
            place_id: row.get("visit_place_id")?,
            semantic_type: row.get("visit_semantic_type")?,
        })
    } else {
        None
    };

    let activity = if kind.is_activity() {
        Some(ActivityDetails {
            distance_meters: row.get("activity_distance_meters")?,
            activity_type: row.get("activity_type")?,
            probability: row.get("activity_probability")?,
        })
    } else {
        None
    };

    Ok(LocationRecord {
        kind,
        owner: row.get("owner")?,
        start_time: time_column(row, "start_time", 2)?,
        end_time: time_column(row, "end_time", 3)?,
        point_time: time_column(row, "point_time", 4)?,
        position,
        visit,
        activity,
        comment: row.get("comment")?,
        source,
    })
}

const INSERT_SQL: &str = "INSERT INTO locations (
        owner, kind, key_time, start_time, end_time, point_time,
        latitude, longitude,
        visit_probability, visit_place_id, visit_semantic_type,
        activity_distance_meters, activity_type, activity_probability,
        comment, source, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

fn write_record(conn: &Connection, sql: &str, key: &NaturalKey, r: &LocationRecord) -> Result<usize> {
    let visit = r.visit.clone().unwrap_or_default();
    let activity = r.activity.clone().unwrap_or_default();

    conn.prepare_cached(sql)?.execute(params![
        key.owner,
        key.kind.to_db_str(),
        key.timestamp_text(),
        r.start_time.as_ref().map(canonical_text),
        r.end_time.as_ref().map(canonical_text),
        r.point_time.as_ref().map(canonical_text),
        r.latitude(),
        r.longitude(),
        visit.probability,
        visit.place_id,
        visit.semantic_type,
        activity.distance_meters,
        activity.activity_type,
        activity.probability,
        r.comment,
        r.source.to_db_str(),
        canonical_text(&Utc::now()),
    ])
}

/// Plain insert. Fails on a duplicate natural key.
pub fn insert_record(conn: &Connection, key: &NaturalKey, r: &LocationRecord) -> Result<usize> {
    write_record(conn, INSERT_SQL, key, r)
}

/// Insert, or on a key collision replace only the comment.
pub fn upsert_record(conn: &Connection, key: &NaturalKey, r: &LocationRecord) -> Result<usize> {
    let sql = format!(
        "{INSERT_SQL}
         ON CONFLICT(owner, kind, key_time) DO UPDATE SET comment = excluded.comment"
    );
    write_record(conn, &sql, key, r)
}

pub fn find_by_key(conn: &Connection, key: &NaturalKey) -> Result<Option<LocationRecord>> {
    let sql = format!("{SELECT_COLUMNS} WHERE owner = ?1 AND kind = ?2 AND key_time = ?3");
    conn.prepare_cached(&sql)?
        .query_row(
            params![key.owner, key.kind.to_db_str(), key.timestamp_text()],
            map_row,
        )
        .optional()
}

/// Returns the number of rows touched (0 when the key is unknown).
pub fn update_comment(conn: &Connection, key: &NaturalKey, comment: &str) -> Result<usize> {
    conn.prepare_cached(
        "UPDATE locations SET comment = ?4
         WHERE owner = ?1 AND kind = ?2 AND key_time = ?3",
    )?
    .execute(params![
        key.owner,
        key.kind.to_db_str(),
        key.timestamp_text(),
        comment
    ])
}

/// Records in key order, optionally narrowed to one owner and/or kind.
pub fn load_records(
    conn: &Connection,
    owner: Option<&str>,
    kind: Option<RecordKind>,
    limit: Option<usize>,
) -> Result<Vec<LocationRecord>> {
    let mut sql = format!("{SELECT_COLUMNS} WHERE 1 = 1");
    let mut args: Vec<String> = Vec::new();

    if let Some(o) = owner {
        args.push(o.to_string());
        sql.push_str(&format!(" AND owner = ?{}", args.len()));
    }
    if let Some(k) = kind {
        args.push(k.to_db_str().to_string());
        sql.push_str(&format!(" AND kind = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY key_time ASC, id ASC");
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_records(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))
}
