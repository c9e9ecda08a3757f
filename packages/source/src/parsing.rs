//! Field parsing for raw incident rows.
//!
//! The source CSV is not consistent about date formatting and writes the
//! UCR part as either an integer or a float, so every parser here is
//! tolerant and returns `None` instead of an error.

use chrono::{NaiveDate, NaiveDateTime};
use crime_dashboard_crime_models::UcrPart;

/// Date-time formats accepted for `DATE OCC`, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only formats accepted for `DATE OCC`, tried after the date-time
/// formats.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parses an occurrence date under any of the accepted formats.
#[must_use]
pub fn parse_occurrence_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parses lat/lng from optional string fields. Returns `None` if missing,
/// unparseable, non-finite, or zero.
#[must_use]
pub fn parse_lat_lng_str(lat: Option<&str>, lng: Option<&str>) -> Option<(f64, f64)> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}

/// Parses the `Part 1-2` column, accepting `"1"` as well as `"1.0"`.
#[must_use]
pub fn parse_ucr_part(s: &str) -> Option<UcrPart> {
    let value = s.trim().parse::<f64>().ok()?;
    if value.fract() != 0.0 || !(1.0..=2.0).contains(&value) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    UcrPart::from_value(value as u8).ok()
}
