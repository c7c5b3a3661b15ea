//! Semantic timeline extraction.
//!
//! Each segment is decoded on its own and fanned out into
//! [`SegmentPayload`]s; every payload becomes exactly one record. Only a
//! missing `semanticSegments` array is fatal. Anything smaller is dropped or
//! nulled and noted in the [`Extraction`].

use crate::core::context::IngestContext;
use crate::core::coords::decode_point;
use crate::core::report::Extraction;
use crate::core::timestamp::{RawTimestamp, normalize};
use crate::errors::{AppError, AppResult};
use crate::models::timeline::{
    RawActivity, RawPathPoint, RawSegment, RawVisit, number, offset_minutes,
};
use crate::models::{
    ActivityDetails, ActivityEdge, LocationRecord, RecordSource, TimeSpan, VisitDetails,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

const SEGMENTS_KEY: &str = "semanticSegments";

/// One sub-event of a segment. A segment may contribute any mix of these.
#[derive(Debug)]
pub enum SegmentPayload {
    PathPoint {
        index: usize,
        point: RawPathPoint,
    },
    Visit(RawVisit),
    ActivityEndpoint {
        edge: ActivityEdge,
        lat_lng: String,
        details: ActivityDetails,
    },
}

/// Segment header decoded into canonical times.
struct SegmentContext {
    index: usize,
    span: TimeSpan,
    /// `None` when the start offset is unreadable; path point times
    /// depend on it and stay null.
    start_offset: Option<i32>,
}

pub fn extract_timeline_str(json: &str, ctx: &IngestContext) -> AppResult<Extraction> {
    let doc: Value = serde_json::from_str(json)?;
    extract_timeline(&doc, ctx)
}

pub fn extract_timeline_reader<R: Read>(reader: R, ctx: &IngestContext) -> AppResult<Extraction> {
    let doc: Value = serde_json::from_reader(reader)?;
    extract_timeline(&doc, ctx)
}

/// Walk `semanticSegments` and emit one record per sub-event.
pub fn extract_timeline(doc: &Value, ctx: &IngestContext) -> AppResult<Extraction> {
    let segments = doc
        .get(SEGMENTS_KEY)
        .ok_or_else(|| AppError::MissingStructure(format!("'{SEGMENTS_KEY}' key not found")))?
        .as_array()
        .ok_or_else(|| AppError::MissingStructure(format!("'{SEGMENTS_KEY}' is not an array")))?;

    let mut out = Extraction::default();

    for (index, raw) in segments.iter().enumerate() {
        let segment = match RawSegment::deserialize(raw) {
            Ok(s) => s,
            Err(e) => {
                out.skip(format!("segment {index}"), AppError::Json(e));
                continue;
            }
        };

        let seg_ctx = segment_context(index, &segment, ctx, &mut out);
        for payload in fan_out(index, segment, &mut out) {
            let record = payload_to_record(payload, &seg_ctx, ctx, &mut out);
            out.records.push(record);
        }
    }

    Ok(out)
}

fn segment_context(
    index: usize,
    segment: &RawSegment,
    ctx: &IngestContext,
    out: &mut Extraction,
) -> SegmentContext {
    let start_offset = out
        .absorb(
            offset_minutes(segment.start_time_timezone_utc_offset_minutes.as_ref()),
            || format!("segment {index} startTimeTimezoneUtcOffsetMinutes"),
        )
        .map(|o| o.unwrap_or(0));
    let end_offset = out
        .absorb(
            offset_minutes(segment.end_time_timezone_utc_offset_minutes.as_ref()),
            || format!("segment {index} endTimeTimezoneUtcOffsetMinutes"),
        )
        .map(|o| o.unwrap_or(0));

    SegmentContext {
        index,
        span: TimeSpan {
            start: segment_time(segment.start_time.as_deref(), start_offset, ctx, out, || {
                format!("segment {index} startTime")
            }),
            end: segment_time(segment.end_time.as_deref(), end_offset, ctx, out, || {
                format!("segment {index} endTime")
            }),
        },
        start_offset,
    }
}

/// A header or path point time shifted by its offset. An unreadable
/// offset was already reported and leaves the time null.
fn segment_time(
    text: Option<&str>,
    offset: Option<i32>,
    ctx: &IngestContext,
    out: &mut Extraction,
    location: impl FnOnce() -> String,
) -> Option<DateTime<Utc>> {
    let offset = offset?;
    let time = normalize(
        text.map(|t| RawTimestamp::WithOffset(t, offset)),
        &ctx.local_zone,
    );
    out.absorb(time, location).flatten()
}

/// Decode the optional sub-structures of a segment into payloads.
/// Sub-structures that do not decode are skipped here.
pub fn fan_out(index: usize, segment: RawSegment, out: &mut Extraction) -> Vec<SegmentPayload> {
    let mut payloads = Vec::new();

    if let Some(path) = segment.timeline_path {
        for (i, entry) in path.into_iter().enumerate() {
            match serde_json::from_value::<RawPathPoint>(entry) {
                Ok(point) => payloads.push(SegmentPayload::PathPoint { index: i, point }),
                Err(e) => out.skip(
                    format!("segment {index} timelinePath[{i}]"),
                    AppError::Json(e),
                ),
            }
        }
    }

    if let Some(visit) = segment.visit {
        match serde_json::from_value::<RawVisit>(visit) {
            Ok(v) => payloads.push(SegmentPayload::Visit(v)),
            Err(e) => out.skip(format!("segment {index} visit"), AppError::Json(e)),
        }
    }

    if let Some(activity) = segment.activity {
        match serde_json::from_value::<RawActivity>(activity) {
            Ok(a) => payloads.extend(activity_endpoints(index, a, out)),
            Err(e) => out.skip(format!("segment {index} activity"), AppError::Json(e)),
        }
    }

    payloads
}

/// One payload per activity endpoint that carries a coordinate.
fn activity_endpoints(
    index: usize,
    activity: RawActivity,
    out: &mut Extraction,
) -> Vec<SegmentPayload> {
    let (activity_type, probability) = match activity.top_candidate {
        Some(c) => (c.activity_type, c.probability),
        None => (None, None),
    };
    let details = ActivityDetails {
        distance_meters: out
            .absorb(number(activity.distance_meters.as_ref()), || {
                format!("segment {index} activity distanceMeters")
            })
            .flatten(),
        activity_type,
        probability: out
            .absorb(number(probability.as_ref()), || {
                format!("segment {index} activity probability")
            })
            .flatten(),
    };

    [
        (ActivityEdge::Start, activity.start),
        (ActivityEdge::End, activity.end),
    ]
    .into_iter()
    .filter_map(|(edge, endpoint)| {
        endpoint
            .and_then(|e| e.lat_lng)
            .map(|lat_lng| SegmentPayload::ActivityEndpoint {
                edge,
                lat_lng,
                details: details.clone(),
            })
    })
    .collect()
}

fn payload_to_record(
    payload: SegmentPayload,
    seg: &SegmentContext,
    ctx: &IngestContext,
    out: &mut Extraction,
) -> LocationRecord {
    let n = seg.index;
    match payload {
        SegmentPayload::PathPoint { index, point } => {
            let position = match point.point.as_deref() {
                Some(text) => out.absorb(decode_point(text), || {
                    format!("segment {n} timelinePath[{index}] point")
                }),
                None => None,
            };
            let point_time = segment_time(point.time.as_deref(), seg.start_offset, ctx, out, || {
                format!("segment {n} timelinePath[{index}] time")
            });

            LocationRecord::path_point(&ctx.owner, point_time, position, RecordSource::Timeline)
                .with_span(seg.span)
        }

        SegmentPayload::Visit(visit) => {
            let candidate = visit.top_candidate;
            let lat_lng = candidate
                .as_ref()
                .and_then(|c| c.place_location.as_ref())
                .and_then(|l| l.lat_lng.as_deref());
            let position = match lat_lng {
                Some(text) => out.absorb(decode_point(text), || {
                    format!("segment {n} visit placeLocation")
                }),
                None => None,
            };
            let (place_id, semantic_type) = match candidate {
                Some(c) => (c.place_id, c.semantic_type),
                None => (None, None),
            };
            let probability = out
                .absorb(number(visit.probability.as_ref()), || {
                    format!("segment {n} visit probability")
                })
                .flatten();

            LocationRecord::visit(
                &ctx.owner,
                seg.span,
                position,
                VisitDetails {
                    probability,
                    place_id,
                    semantic_type,
                },
            )
        }

        SegmentPayload::ActivityEndpoint {
            edge,
            lat_lng,
            details,
        } => {
            let position = out.absorb(decode_point(&lat_lng), || {
                format!("segment {n} activity {}", edge.kind())
            });
            LocationRecord::activity_endpoint(&ctx.owner, edge, seg.span, position, details)
        }
    }
}
