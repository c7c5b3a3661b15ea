//! Photo metadata extraction.
//!
//! A photo always yields a record: missing or broken GPS data only nulls the
//! coordinates, and a missing capture time falls back according to
//! [`PhotoTimeFallback`].

use crate::core::context::IngestContext;
use crate::core::coords::decode_dms_rationals;
use crate::core::report::{Extraction, Issue};
use crate::errors::{AppError, AppResult};
use crate::models::{GeoPoint, LocationRecord, RecordSource};
use crate::utils::path::extension_lower;
use crate::utils::time::parse_utc_offset;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use exif::{Exif, In, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

pub const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "tif", "tiff", "heic", "heif", "webp"];

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// What to do when a photo has no readable capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoTimeFallback {
    /// Stamp the record with the processing time.
    #[default]
    Now,
    /// Leave `point_time` empty; the record cannot be stored until edited.
    Unknown,
}

/// One processed image.
#[derive(Debug)]
pub struct PhotoOutcome {
    pub name: String,
    pub record: LocationRecord,
    /// Record-level problems (no metadata, bad coordinates, bad time).
    pub issues: Vec<AppError>,
}

/// Image entries by extension. Resource-fork files written by macOS archivers
/// (`__MACOSX/`, `._name.jpg`) are not images even when named like one.
pub fn is_image_name(name: &str) -> bool {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    if name.starts_with("__MACOSX/") || file_name.starts_with("._") {
        return false;
    }
    extension_lower(file_name).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn extract_image(name: &str, bytes: &[u8], ctx: &IngestContext) -> PhotoOutcome {
    extract_image_at(name, bytes, ctx, Utc::now())
}

/// [`extract_image`] with an explicit processing time for the fallback.
pub fn extract_image_at(
    name: &str,
    bytes: &[u8],
    ctx: &IngestContext,
    processed_at: DateTime<Utc>,
) -> PhotoOutcome {
    let mut issues = Vec::new();

    let (position, capture_time) = match read_exif(bytes) {
        Ok(exif) => {
            let position = read_gps(&exif).map_err(|e| issues.push(e)).ok();
            let time = read_capture_time(&exif, &ctx.local_zone)
                .map_err(|e| issues.push(e))
                .ok();
            (position, time)
        }
        Err(e) => {
            issues.push(e);
            (None, None)
        }
    };

    let point_time = capture_time.or(match ctx.photo_time_fallback {
        PhotoTimeFallback::Now => Some(processed_at),
        PhotoTimeFallback::Unknown => None,
    });

    PhotoOutcome {
        name: name.to_string(),
        record: LocationRecord::path_point(&ctx.owner, point_time, position, RecordSource::Photo),
        issues,
    }
}

/// Every image entry of a zip archive. Entries that cannot be read are
/// skipped; an archive that cannot be opened is an error.
pub fn extract_archive(bytes: &[u8], ctx: &IngestContext) -> AppResult<Extraction> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let processed_at = Utc::now();
    let mut out = Extraction::default();

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                out.skip(format!("archive entry {i}"), AppError::Archive(e));
                continue;
            }
        };
        if entry.is_dir() || !is_image_name(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut buf = Vec::new();
        if let Err(e) = entry.read_to_end(&mut buf) {
            out.skip(name, AppError::Io(e));
            continue;
        }

        push_outcome(&mut out, extract_image_at(&name, &buf, ctx, processed_at));
    }

    Ok(out)
}

/// A single image or a zip archive on disk.
pub fn extract_path(path: &Path, ctx: &IngestContext) -> AppResult<Extraction> {
    let name = path.to_string_lossy().to_string();
    let ext = extension_lower(&name);

    if ext.as_deref() == Some("zip") {
        let bytes = fs::read(path)?;
        return extract_archive(&bytes, ctx);
    }

    if !is_image_name(&name) {
        return Err(AppError::InvalidInput(format!(
            "{name}: not an image ({}) or a .zip archive",
            IMAGE_EXTENSIONS.join(", ")
        )));
    }

    let bytes = fs::read(path)?;
    let mut out = Extraction::default();
    push_outcome(&mut out, extract_image(&name, &bytes, ctx));
    Ok(out)
}

pub(crate) fn push_outcome(out: &mut Extraction, outcome: PhotoOutcome) {
    let PhotoOutcome {
        name,
        record,
        issues,
    } = outcome;
    out.issues.extend(issues.into_iter().map(|error| Issue {
        location: name.clone(),
        error,
    }));
    out.records.push(record);
}

fn read_exif(bytes: &[u8]) -> AppResult<Exif> {
    let mut cursor = Cursor::new(bytes);
    exif::Reader::new()
        .read_from_container(&mut cursor)
        .map_err(|e| AppError::MetadataUnavailable(format!("no readable EXIF data ({e})")))
}

fn read_gps(exif: &Exif) -> AppResult<GeoPoint> {
    let lat = dms_field(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let lon = dms_field(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    GeoPoint::new(lat, lon)
}

fn dms_field(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> AppResult<f64> {
    let field = exif
        .get_field(value_tag, In::PRIMARY)
        .ok_or_else(|| AppError::MetadataUnavailable(format!("no {value_tag} tag")))?;
    let hemisphere = ascii_field(exif, ref_tag)
        .ok_or_else(|| AppError::MetadataUnavailable(format!("no {ref_tag} tag")))?;

    match &field.value {
        Value::Rational(parts) => decode_dms_rationals(parts, &hemisphere),
        other => Err(AppError::MalformedCoordinate(format!(
            "{value_tag} is not a rational triple: {other:?}"
        ))),
    }
}

fn read_capture_time(exif: &Exif, local_zone: &FixedOffset) -> AppResult<DateTime<Utc>> {
    let text = ascii_field(exif, Tag::DateTimeOriginal)
        .ok_or_else(|| AppError::MetadataUnavailable("no DateTimeOriginal tag".into()))?;

    let zone = ascii_field(exif, Tag::OffsetTimeOriginal)
        .and_then(|o| parse_utc_offset(&o).ok())
        .unwrap_or(*local_zone);

    parse_exif_datetime(&text, &zone)
}

/// `YYYY:MM:DD HH:MM:SS` in `zone`, to UTC.
pub fn parse_exif_datetime(text: &str, zone: &FixedOffset) -> AppResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), EXIF_DATETIME_FORMAT).map_err(|e| {
        AppError::MalformedTimestamp(format!("DateTimeOriginal '{text}': {e}"))
    })?;
    zone.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::MalformedTimestamp(format!("DateTimeOriginal '{text}'")))
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}
