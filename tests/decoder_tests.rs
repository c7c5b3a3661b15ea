mod common;
use common::{tokyo, utc};

use chrono::FixedOffset;
use pathfinder::core::coords::{decode_dms, decode_dms_rationals, decode_point, decode_signed_pair};
use pathfinder::core::timestamp::{
    RawTimestamp, canonical, normalize, parse_flexible, parse_naive, parse_with_offset, parse_zoned,
    project,
};
use pathfinder::errors::AppError;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ------------------------------------------------------------
// Coordinates
// ------------------------------------------------------------

#[test]
fn dms_hemispheres_are_symmetric() {
    let north = decode_dms(10.0, 30.0, 0.0, "N").unwrap();
    let south = decode_dms(10.0, 30.0, 0.0, "S").unwrap();
    assert!(close(north, 10.5));
    assert!(close(south, -north));

    let east = decode_dms(139.0, 42.0, 0.0, "E").unwrap();
    let west = decode_dms(139.0, 42.0, 0.0, "w").unwrap();
    assert!(close(east, 139.7));
    assert!(close(west, -east));
}

#[test]
fn dms_rejects_unknown_hemisphere_and_nan() {
    assert!(matches!(
        decode_dms(1.0, 0.0, 0.0, "X"),
        Err(AppError::MalformedCoordinate(_))
    ));
    assert!(matches!(
        decode_dms(f64::NAN, 0.0, 0.0, "N"),
        Err(AppError::MalformedCoordinate(_))
    ));
}

#[test]
fn dms_rationals_need_three_parts_and_nonzero_denominators() {
    use exif::Rational;
    let ok = [
        Rational { num: 35, denom: 1 },
        Rational { num: 39, denom: 1 },
        Rational { num: 36, denom: 1 },
    ];
    assert!(close(decode_dms_rationals(&ok, "N").unwrap(), 35.66));

    assert!(decode_dms_rationals(&ok[..2], "N").is_err());

    let zero = [
        Rational { num: 35, denom: 0 },
        Rational { num: 39, denom: 1 },
        Rational { num: 36, denom: 1 },
    ];
    let err = decode_dms_rationals(&zero, "N").unwrap_err();
    assert!(err.is_record_level());
}

#[test]
fn signed_pair_with_degree_signs_and_whitespace() {
    let (lat, lon) = decode_signed_pair("34.78°, 135.47°").unwrap();
    assert!(close(lat, 34.78) && close(lon, 135.47));

    let (lat, lon) = decode_signed_pair("  -33.8688° ,151.2093  ").unwrap();
    assert!(close(lat, -33.8688) && close(lon, 151.2093));
}

#[test]
fn signed_pair_errors_are_malformed_coordinate() {
    for bad in ["34.78 135.47", "", "north, east", "95.0°, 10.0°", "10.0°, 181.0°"] {
        assert!(
            matches!(decode_signed_pair(bad), Err(AppError::MalformedCoordinate(_))),
            "{bad:?} should not decode"
        );
    }
}

#[test]
fn decode_point_builds_geo_point() {
    let p = decode_point("35.0°, 139.0°").unwrap();
    assert!(close(p.latitude, 35.0));
    assert!(close(p.longitude, 139.0));
}

// ------------------------------------------------------------
// Timestamps
// ------------------------------------------------------------

#[test]
fn separate_offset_is_subtracted_from_utc_reading() {
    let dt = parse_with_offset("2024-01-01T00:00:00Z", 540).unwrap();
    assert_eq!(dt, utc(2023, 12, 31, 15, 0, 0));

    // no zone at all: read as UTC too
    let dt = parse_with_offset("2024-01-01T00:00:00.000", 540).unwrap();
    assert_eq!(dt, utc(2023, 12, 31, 15, 0, 0));

    let dt = parse_with_offset("2024-01-01T00:00:00Z", 0).unwrap();
    assert_eq!(dt, utc(2024, 1, 1, 0, 0, 0));
}

#[test]
fn zoned_text_is_an_absolute_instant() {
    assert_eq!(
        parse_zoned("2024-05-01T10:00:00+09:00").unwrap(),
        utc(2024, 5, 1, 1, 0, 0)
    );
    // pandas-style: space separator and offset
    assert_eq!(
        parse_zoned("2023-12-31 15:00:00+00:00").unwrap(),
        utc(2023, 12, 31, 15, 0, 0)
    );
    assert_eq!(
        parse_zoned("2024-01-01 00:00:00Z").unwrap(),
        utc(2024, 1, 1, 0, 0, 0)
    );
}

#[test]
fn naive_text_is_read_in_reference_zone() {
    assert_eq!(
        parse_naive("2024:05:01 10:00:00", &tokyo()).unwrap(),
        utc(2024, 5, 1, 1, 0, 0)
    );
    assert_eq!(
        parse_naive("2024-05-01 10:00", &tokyo()).unwrap(),
        utc(2024, 5, 1, 1, 0, 0)
    );
}

#[test]
fn flexible_prefers_explicit_zone() {
    assert_eq!(
        parse_flexible("2024-05-01T10:00:00Z", &tokyo()).unwrap(),
        utc(2024, 5, 1, 10, 0, 0)
    );
    assert_eq!(
        parse_flexible("2024-05-01 10:00:00", &tokyo()).unwrap(),
        utc(2024, 5, 1, 1, 0, 0)
    );
}

#[test]
fn missing_input_stays_missing() {
    assert_eq!(normalize(None, &tokyo()).unwrap(), None);
}

#[test]
fn unparseable_text_is_malformed_timestamp() {
    for raw in [
        RawTimestamp::Zoned("yesterday"),
        RawTimestamp::WithOffset("not a date", 60),
        RawTimestamp::Naive("2024-13-45 99:00:00"),
    ] {
        let err = normalize(Some(raw), &tokyo()).unwrap_err();
        assert!(matches!(err, AppError::MalformedTimestamp(_)), "{raw:?}");
        assert!(err.is_record_level());
    }
}

#[test]
fn projection_round_trips_to_the_same_instant() {
    let instant = utc(2024, 1, 1, 0, 10, 0);
    let zones = [
        tokyo(),
        FixedOffset::west_opt(5 * 3600 + 1800).unwrap(),
        FixedOffset::east_opt(0).unwrap(),
    ];
    for zone in zones {
        assert_eq!(canonical(&project(&instant, &zone)), instant);
    }
    assert_eq!(
        project(&instant, &tokyo()).format("%Y-%m-%d %H:%M").to_string(),
        "2024-01-01 09:10"
    );
}
