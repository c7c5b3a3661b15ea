use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{TIMELINE_ONE_SEGMENT, bare_jpeg, pf, setup, setup_initialized, shibuya_jpeg, write_file, zip_of};

#[test]
fn init_creates_database_and_logs_migrations() {
    let (home, db) = setup("cli_init");

    pf(&home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Migration applied"))
        .stdout(contains("Database initialized"));

    assert!(fs::metadata(&db).is_ok());
    // test mode never writes the config file
    assert!(fs::metadata(format!("{home}/pathfinder.conf")).is_err());

    pf(&home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"));
}

#[test]
fn timeline_import_then_list() {
    let (home, db) = setup_initialized("cli_timeline_list");
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "timeline", &file])
        .assert()
        .success()
        .stdout(contains("5 of 5 records imported"));

    // key times shown in the display zone (+09:00)
    pf(&home)
        .args(["--db", &db, "--owner", "alice", "list"])
        .assert()
        .success()
        .stdout(contains("2024-01-01 00:10:00"))
        .stdout(contains("HOME"))
        .stdout(contains("WALKING"))
        .stdout(contains("5 record(s)"));

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "list", "--kind", "visit"])
        .assert()
        .success()
        .stdout(contains("1 record(s)"));

    pf(&home)
        .args(["--db", &db, "--owner", "bob", "list"])
        .assert()
        .success()
        .stdout(contains("No records stored for 'bob'"));
}

#[test]
fn reimport_updates_instead_of_duplicating() {
    let (home, db) = setup_initialized("cli_reimport");
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());

    for _ in 0..2 {
        pf(&home)
            .args(["--db", &db, "--owner", "alice", "timeline", &file])
            .assert()
            .success();
    }

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "timeline", &file])
        .assert()
        .success()
        .stdout(contains("inserted: 0, updated: 5"));

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "stats"])
        .assert()
        .success()
        .stdout(contains("Total records:"))
        .stdout(contains("visit"));
}

#[test]
fn dry_run_writes_nothing() {
    let (home, db) = setup_initialized("cli_dry_run");
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "timeline", &file, "--dry-run"])
        .assert()
        .success()
        .stdout(contains("Dry run"));

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "list"])
        .assert()
        .success()
        .stdout(contains("No records stored"));
}

#[test]
fn missing_segments_fails_the_import() {
    let (home, db) = setup_initialized("cli_missing_segments");
    let file = write_file(&home, "wrong.json", br#"{ "timelineObjects": [] }"#);

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "timeline", &file])
        .assert()
        .failure()
        .stderr(contains("semanticSegments"));
}

#[test]
fn import_requires_an_owner() {
    let (home, db) = setup_initialized("cli_no_owner");
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());

    pf(&home)
        .args(["--db", &db, "timeline", &file])
        .assert()
        .failure()
        .stderr(contains("no owner given"));
}

#[test]
fn photos_from_files_and_archives() {
    let (home, db) = setup_initialized("cli_photos");
    let image = write_file(&home, "shot.jpg", &shibuya_jpeg());
    let bare = bare_jpeg();
    let archive = write_file(
        &home,
        "album.zip",
        &zip_of(&[("a/no_exif.jpg", bare.as_slice()), ("a/readme.txt", b"hi".as_slice())]),
    );

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "photos", &image, &archive])
        .assert()
        .success()
        .stdout(contains("2 of 2 records imported"))
        .stdout(contains("a/no_exif.jpg"));

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "list"])
        .assert()
        .success()
        .stdout(contains("35.660000"))
        .stdout(contains("photo"));
}

#[test]
fn add_then_comment() {
    let (home, db) = setup_initialized("cli_add_comment");

    pf(&home)
        .args([
            "--db",
            &db,
            "--owner",
            "alice",
            "add",
            "--lat",
            "-33.8688",
            "--lon",
            "151.2093",
            "--at",
            "2024-02-01T03:00:00Z",
            "--comment",
            "harbour",
        ])
        .assert()
        .success()
        .stdout(contains("Position added"));

    // 03:00Z is 12:00 in the display zone
    pf(&home)
        .args([
            "--db",
            &db,
            "--owner",
            "alice",
            "comment",
            "--kind",
            "path_point",
            "--at",
            "2024-02-01 12:00:00",
            "--text",
            "ferry",
        ])
        .assert()
        .success()
        .stdout(contains("previous: harbour"));

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "list"])
        .assert()
        .success()
        .stdout(contains("ferry").and(contains("harbour").not()));

    pf(&home)
        .args([
            "--db", &db, "--owner", "alice", "comment", "--kind", "visit", "--at",
            "2024-02-01 12:00:00", "--text", "x",
        ])
        .assert()
        .failure();
}

#[test]
fn export_csv_and_import_into_another_database() {
    let (home, db) = setup_initialized("cli_export_import");
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());
    let out = format!("{home}/export.csv");
    let other_db = format!("{home}/other.sqlite");

    pf(&home)
        .args(["--db", &db, "--owner", "alice", "timeline", &file])
        .assert()
        .success();

    pf(&home)
        .args([
            "--db", &db, "--owner", "alice", "export", "--format", "csv", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    assert!(content.starts_with("kind,owner,start_time"));
    assert!(content.contains("2024-01-01T00:00:00+09:00"));

    pf(&home)
        .args(["--db", &other_db, "--owner", "alice", "import-csv", &out])
        .assert()
        .success()
        .stdout(contains("5 of 5 records imported"));

    pf(&home)
        .args(["--db", &other_db, "--owner", "alice", "list"])
        .assert()
        .success()
        .stdout(contains("5 record(s)"));
}

#[test]
fn export_json() {
    let (home, db) = setup_initialized("cli_export_json");
    let out = format!("{home}/export.json");

    pf(&home)
        .args([
            "--db", &db, "--owner", "alice", "add", "--lat", "35", "--lon", "139", "--at",
            "2024-03-01T00:00:00Z",
        ])
        .assert()
        .success();

    pf(&home)
        .args([
            "--db", &db, "--owner", "alice", "export", "--format", "json", "--file", &out,
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["kind"], "path_point");
    assert_eq!(rows[0]["source"], "manual");
}

#[test]
fn config_print_shows_defaults() {
    let (home, _) = setup("cli_config_print");

    pf(&home)
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("local_utc_offset"))
        .stdout(contains("+09:00"))
        .stdout(contains("photo_time_fallback: now"));
}

#[test]
fn default_owner_from_config_file() {
    let (home, db) = setup_initialized("cli_default_owner");
    write_file(
        &home,
        "pathfinder.conf",
        format!("database: {db}\ndefault_owner: carol\n").as_bytes(),
    );
    let file = write_file(&home, "timeline.json", TIMELINE_ONE_SEGMENT.as_bytes());

    pf(&home).args(["timeline", &file]).assert().success();

    pf(&home)
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("Records of 'carol'"));
}
