mod common;
use common::{OWNER, TIMELINE_ONE_SEGMENT, ctx, setup, utc};

use pathfinder::core::add::AddLogic;
use pathfinder::core::comment::CommentLogic;
use pathfinder::core::import::ImportLogic;
use pathfinder::core::timeline::extract_timeline_str;
use pathfinder::core::upsert::{MemoryStore, RecordStore, UpsertAction, upsert_all, upsert_one};
use pathfinder::db::pool::DbPool;
use pathfinder::db::queries::{count_records, load_records};
use pathfinder::db::stats::collect_stats;
use pathfinder::errors::AppError;
use pathfinder::export::{ExportFormat, ExportLogic, read_csv_path};
use pathfinder::models::{GeoPoint, LocationRecord, NaturalKey, RecordKind, RecordSource};
use std::collections::BTreeSet;
use std::path::Path;

fn photo_at(lat: f64, comment: &str) -> LocationRecord {
    LocationRecord::path_point(
        OWNER,
        Some(utc(2024, 5, 1, 1, 0, 0)),
        Some(GeoPoint::new(lat, 139.7).unwrap()),
        RecordSource::Photo,
    )
    .with_comment(comment)
}

/// Same key twice: one row, the latest comment, the first coordinates.
fn assert_comment_only_update<S: RecordStore>(store: &mut S) {
    let first = photo_at(35.0, "first");
    let second = photo_at(36.0, "second");

    assert_eq!(upsert_one(store, &first).unwrap(), UpsertAction::Inserted);
    assert_eq!(upsert_one(store, &second).unwrap(), UpsertAction::Updated);

    let key = first.natural_key().unwrap();
    let stored = store.find(&key).unwrap().unwrap();
    assert_eq!(stored.comment, "second");
    assert_eq!(stored.latitude(), Some(35.0));
    assert_eq!(stored.point_time, first.point_time);
}

#[test]
fn memory_store_updates_comment_only() {
    let mut store = MemoryStore::new();
    assert_comment_only_update(&mut store);
    assert_eq!(store.len(), 1);

    let key = photo_at(35.0, "").natural_key().unwrap();
    assert_eq!(store.get(&key).map(|r| r.comment.as_str()), Some("second"));
}

#[test]
fn sqlite_store_updates_comment_only() {
    let mut pool = DbPool::open_in_memory().unwrap();
    assert_comment_only_update(&mut pool);
    assert_eq!(count_records(&pool.conn).unwrap(), 1);
}

#[test]
fn empty_comment_overwrites_too() {
    let mut pool = DbPool::open_in_memory().unwrap();
    upsert_one(&mut pool, &photo_at(35.0, "keep me?")).unwrap();
    upsert_one(&mut pool, &photo_at(35.0, "")).unwrap();

    let key = photo_at(35.0, "").natural_key().unwrap();
    assert_eq!(pool.find(&key).unwrap().unwrap().comment, "");
}

#[test]
fn records_without_key_time_are_not_stored() {
    let mut pool = DbPool::open_in_memory().unwrap();
    let unkeyed = LocationRecord::path_point(OWNER, None, None, RecordSource::Photo);

    assert_eq!(upsert_one(&mut pool, &unkeyed).unwrap(), UpsertAction::Unkeyed);
    assert_eq!(count_records(&pool.conn).unwrap(), 0);
}

#[test]
fn kind_keeps_segment_records_apart() {
    let mut pool = DbPool::open_in_memory().unwrap();
    let out = extract_timeline_str(TIMELINE_ONE_SEGMENT, &ctx()).unwrap();

    let summary = upsert_all(&mut pool, &out.records).unwrap();
    assert_eq!(summary.inserted, 5);
    assert_eq!(summary.updated, 0);

    // visit, activity_start and activity_end share start_time
    let visits = load_records(&pool.conn, Some(OWNER), Some(RecordKind::Visit), None).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].visit.as_ref().unwrap().semantic_type.as_deref(), Some("HOME"));
}

#[test]
fn reimport_is_idempotent() {
    let mut pool = DbPool::open_in_memory().unwrap();
    let out = extract_timeline_str(TIMELINE_ONE_SEGMENT, &ctx()).unwrap();

    let first = ImportLogic::store(&mut pool, &out).unwrap();
    let second = ImportLogic::store(&mut pool, &out).unwrap();

    assert_eq!(first.store.inserted, 5);
    assert_eq!(second.store.inserted, 0);
    assert_eq!(second.store.updated, 5);
    assert_eq!(count_records(&pool.conn).unwrap(), 5);
    assert_eq!(second.summary_line(), "5 of 5 records imported, 0 skipped for missing data");
}

#[test]
fn owners_do_not_collide() {
    let mut pool = DbPool::open_in_memory().unwrap();
    let alice = extract_timeline_str(TIMELINE_ONE_SEGMENT, &ctx()).unwrap();
    let bob = extract_timeline_str(
        TIMELINE_ONE_SEGMENT,
        &pathfinder::core::context::IngestContext::new("bob", common::tokyo()),
    )
    .unwrap();

    upsert_all(&mut pool, &alice.records).unwrap();
    upsert_all(&mut pool, &bob.records).unwrap();
    assert_eq!(count_records(&pool.conn).unwrap(), 10);

    let stats = collect_stats(&pool.conn, Some("bob")).unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.with_position, 5);
    assert_eq!(stats.by_semantic_type, vec![("HOME".to_string(), 1)]);
    assert_eq!(stats.by_activity_type, vec![("WALKING".to_string(), 1)]);
    assert_eq!(stats.first_key_time.as_deref(), Some("2023-12-31T15:00:00.000Z"));
}

#[test]
fn manual_add_and_comment_edit() {
    let mut pool = DbPool::open_in_memory().unwrap();
    let at = utc(2024, 2, 1, 3, 0, 0);

    let (record, action) = AddLogic::apply(&mut pool, OWNER, -33.8688, 151.2093, at, "harbour").unwrap();
    assert_eq!(action, UpsertAction::Inserted);
    assert_eq!(record.source, RecordSource::Manual);

    let key = NaturalKey {
        owner: OWNER.to_string(),
        kind: RecordKind::PathPoint,
        timestamp: at,
    };
    let previous = CommentLogic::apply(&mut pool, &key, "ferry").unwrap();
    assert_eq!(previous.comment, "harbour");
    assert_eq!(pool.find(&key).unwrap().unwrap().comment, "ferry");

    let missing = NaturalKey {
        kind: RecordKind::Visit,
        ..key
    };
    assert!(matches!(
        CommentLogic::apply(&mut pool, &missing, "x"),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn manual_add_rejects_out_of_range_coordinates() {
    let mut store = MemoryStore::new();
    let err = AddLogic::apply(&mut store, OWNER, 91.0, 0.0, utc(2024, 1, 1, 0, 0, 0), "").unwrap_err();
    assert!(matches!(err, AppError::MalformedCoordinate(_)));
    assert!(store.is_empty());
}

#[test]
fn csv_export_then_reimport_reproduces_the_keys() {
    let (dir, db) = setup("csv_roundtrip");
    let mut pool = DbPool::open(&db).unwrap();
    let out = extract_timeline_str(TIMELINE_ONE_SEGMENT, &ctx()).unwrap();
    upsert_all(&mut pool, &out.records).unwrap();
    AddLogic::apply(&mut pool, OWNER, 35.0, 139.0, utc(2024, 3, 1, 0, 0, 0), "note, with comma").unwrap();

    let file = Path::new(&dir).join("alice.csv");
    let written = ExportLogic::export(
        &mut pool,
        OWNER,
        ExportFormat::Csv,
        &file,
        &common::tokyo(),
        true,
    )
    .unwrap();
    assert_eq!(written, 6);

    let reread = read_csv_path(&file, &ctx()).unwrap();
    assert_eq!(reread.records.len(), 6);
    assert!(reread.issues.is_empty(), "{:?}", reread.issues);

    let mut fresh = DbPool::open_in_memory().unwrap();
    upsert_all(&mut fresh, &reread.records).unwrap();

    let keys = |pool: &DbPool| -> BTreeSet<(String, String)> {
        load_records(&pool.conn, Some(OWNER), None, None)
            .unwrap()
            .iter()
            .filter_map(|r| r.natural_key())
            .map(|k| (k.kind.to_string(), k.timestamp_text()))
            .collect()
    };
    assert_eq!(keys(&pool), keys(&fresh));

    let manual = load_records(&fresh.conn, Some(OWNER), Some(RecordKind::PathPoint), None)
        .unwrap()
        .into_iter()
        .find(|r| r.source == RecordSource::Manual)
        .unwrap();
    assert_eq!(manual.comment, "note, with comma");
}

#[test]
fn csv_from_the_spreadsheet_converter_is_accepted() {
    let (dir, _) = setup("csv_legacy_headers");
    let csv = "type,start_time,end_time,point_time,latitude,longitude,visit_probability,visit_placeId,visit_semanticType,activity_distanceMeters,activity_type,activity_probability\n\
timelinePath,2023-12-31 15:00:00+00:00,2023-12-31 16:00:00+00:00,2023-12-31 15:10:00+00:00,34.78,135.47,,,,,,\n\
visit,2023-12-31 15:00:00+00:00,2023-12-31 16:00:00+00:00,,34.7805,135.4705,0.91,ChIJplace,HOME,,,\n\
activity_start,2023-12-31 15:00:00+00:00,2023-12-31 16:00:00+00:00,,34.78,135.47,,,,1523.5,WALKING,0.87\n\
teleport,2023-12-31 15:00:00+00:00,,,1,1,,,,,,\n";
    let path = common::write_file(&dir, "legacy.csv", csv.as_bytes());

    let out = read_csv_path(Path::new(&path), &ctx()).unwrap();
    assert_eq!(out.records.len(), 3);
    assert_eq!(out.skipped, 1);

    let point = &out.records[0];
    assert_eq!(point.kind, RecordKind::PathPoint);
    assert_eq!(point.point_time, Some(utc(2023, 12, 31, 15, 10, 0)));
    assert_eq!(point.owner, OWNER);
    assert_eq!(point.source, RecordSource::Csv);

    let visit = out.records[1].visit.as_ref().unwrap();
    assert_eq!(visit.place_id.as_deref(), Some("ChIJplace"));

    let activity = out.records[2].activity.as_ref().unwrap();
    assert_eq!(activity.distance_meters, Some(1523.5));
}

#[test]
fn csv_without_kind_column_is_missing_structure() {
    let (dir, _) = setup("csv_no_kind");
    let path = common::write_file(&dir, "bad.csv", b"latitude,longitude\n1,2\n");
    assert!(matches!(
        read_csv_path(Path::new(&path), &ctx()),
        Err(AppError::MissingStructure(_))
    ));
}
