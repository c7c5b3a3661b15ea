#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{FixedOffset, TimeZone, Utc};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use pathfinder::core::context::IngestContext;
use std::env;
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const OWNER: &str = "alice";

/// Binary under test, with its configuration directory pinned to `home` so
/// a developer's real `~/.pathfinder` is never read.
pub fn pf(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("pathfinder");
    cmd.env("PATHFINDER_HOME", home);
    cmd
}

/// Fresh per-test directory (config home + database) inside the system temp dir.
pub fn setup(name: &str) -> (String, String) {
    let mut dir: PathBuf = env::temp_dir();
    dir.push(format!("pathfinder_{name}"));
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).expect("create test dir");

    let db = dir.join("test.sqlite").to_string_lossy().to_string();
    (dir.to_string_lossy().to_string(), db)
}

/// `setup` plus `--test init`.
pub fn setup_initialized(name: &str) -> (String, String) {
    let (home, db) = setup(name);
    pf(&home)
        .args(["--db", &db, "--test", "init"])
        .assert()
        .success();
    (home, db)
}

/// Write `content` to a file under `dir` and return its path.
pub fn write_file(dir: &str, name: &str, content: &[u8]) -> String {
    let path = PathBuf::from(dir).join(name);
    fs::write(&path, content).expect("write fixture");
    path.to_string_lossy().to_string()
}

pub fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

pub fn ctx() -> IngestContext {
    IngestContext::new(OWNER, tokyo())
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid instant")
}

/// One segment: two path points, a visit and an activity with both ends.
pub const TIMELINE_ONE_SEGMENT: &str = r#"{
  "semanticSegments": [
    {
      "startTime": "2024-01-01T00:00:00.000Z",
      "endTime": "2024-01-01T01:00:00.000Z",
      "startTimeTimezoneUtcOffsetMinutes": 540,
      "endTimeTimezoneUtcOffsetMinutes": 540,
      "timelinePath": [
        { "point": "34.7800000°, 135.4700000°", "time": "2024-01-01T00:10:00.000Z" },
        { "point": "34.7810000°, 135.4710000°", "time": "2024-01-01T00:20:00.000Z" }
      ],
      "visit": {
        "probability": 0.91,
        "topCandidate": {
          "placeId": "ChIJplace",
          "semanticType": "HOME",
          "placeLocation": { "latLng": "34.7805000°, 135.4705000°" }
        }
      },
      "activity": {
        "start": { "latLng": "34.7800000°, 135.4700000°" },
        "end": { "latLng": "34.7900000°, 135.4800000°" },
        "distanceMeters": 1523.5,
        "topCandidate": { "type": "WALKING", "probability": 0.87 }
      }
    }
  ]
}"#;

fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn dms(tag: Tag, d: u32, m: u32, s: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![
            Rational { num: d, denom: 1 },
            Rational { num: m, denom: 1 },
            Rational { num: s, denom: 1 },
        ]),
    }
}

/// GPS part of a photo fixture.
pub struct Gps {
    pub lat: (u32, u32, u32, &'static str),
    pub lon: (u32, u32, u32, &'static str),
}

/// Minimal JPEG carrying only an APP1 EXIF segment.
pub fn exif_jpeg(gps: Option<Gps>, taken: Option<&str>, offset: Option<&str>) -> Vec<u8> {
    let mut fields = Vec::new();
    if let Some(g) = gps {
        fields.push(ascii(Tag::GPSLatitudeRef, g.lat.3));
        fields.push(dms(Tag::GPSLatitude, g.lat.0, g.lat.1, g.lat.2));
        fields.push(ascii(Tag::GPSLongitudeRef, g.lon.3));
        fields.push(dms(Tag::GPSLongitude, g.lon.0, g.lon.1, g.lon.2));
    }
    if let Some(t) = taken {
        fields.push(ascii(Tag::DateTimeOriginal, t));
    }
    if let Some(o) = offset {
        fields.push(ascii(Tag::OffsetTimeOriginal, o));
    }
    // an IFD may not be empty
    fields.push(ascii(Tag::Make, "pathfinder-test"));

    let mut writer = Writer::new();
    for f in &fields {
        writer.push_field(f);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).expect("encode exif");
    let tiff = tiff.into_inner();

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let len = u16::try_from(2 + 6 + tiff.len()).expect("APP1 fits");
    jpeg.extend_from_slice(&len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

/// Shibuya, 35°39'36"N 139°42'00"E, taken 2024-05-01 10:00 local.
pub fn shibuya_jpeg() -> Vec<u8> {
    exif_jpeg(
        Some(Gps {
            lat: (35, 39, 36, "N"),
            lon: (139, 42, 0, "E"),
        }),
        Some("2024:05:01 10:00:00"),
        None,
    )
}

/// A JPEG with no APP1 segment at all.
pub fn bare_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

pub fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        zip.start_file(*name, options).expect("start entry");
        zip.write_all(bytes).expect("write entry");
    }
    zip.finish().expect("finish zip").into_inner()
}
