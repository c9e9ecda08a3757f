//! Incident cleaning.
//!
//! Turns [`RawIncident`] rows into [`Incident`]s, keeping only Part 1
//! offenses with usable coordinates, a parseable date inside the year
//! range, and a known division. Excluded rows are counted, never fatal.

use std::ops::RangeInclusive;

use chrono::Datelike as _;
use crime_dashboard_crime_models::{Incident, UcrPart, normalize_division};
use crime_dashboard_source_models::{CleanReport, RawIncident, Rejection};
use crime_dashboard_spatial::DivisionIndex;

use crate::parsing::{parse_lat_lng_str, parse_occurrence_date, parse_ucr_part};

/// Knobs for a cleaning pass.
#[derive(Clone, Copy)]
pub struct CleanOptions<'a> {
    /// Years to keep (inclusive).
    pub years: &'a RangeInclusive<i32>,
    /// Index used to attribute rows with a blank division name.
    pub locator: Option<&'a DivisionIndex>,
}

/// Where a row's division came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DivisionSource {
    /// The `AREA NAME` column.
    Name,
    /// Point-in-polygon lookup against the boundaries.
    Location,
    /// The `AREA` code column.
    Code,
}

/// Cleans one raw row.
///
/// Checks run in a fixed order (part, coordinates, date, year, division)
/// and the first failing check is reported.
///
/// # Errors
///
/// Returns the [`Rejection`] explaining why the row was excluded.
pub fn clean_record(raw: &RawIncident, options: CleanOptions<'_>) -> Result<Incident, Rejection> {
    clean_row(raw, options).map(|(incident, _)| incident)
}

fn clean_row(
    raw: &RawIncident,
    options: CleanOptions<'_>,
) -> Result<(Incident, DivisionSource), Rejection> {
    if raw.part.as_deref().and_then(parse_ucr_part) != Some(UcrPart::PartOne) {
        return Err(Rejection::NotPartOne);
    }

    let (latitude, longitude) = parse_lat_lng_str(raw.lat.as_deref(), raw.lon.as_deref())
        .ok_or(Rejection::InvalidCoordinates)?;

    let occurred_at = raw
        .date_occ
        .as_deref()
        .and_then(parse_occurrence_date)
        .ok_or(Rejection::UnparseableDate)?;

    if !options.years.contains(&occurred_at.year()) {
        return Err(Rejection::YearOutOfRange);
    }

    let (division, source) =
        resolve_division(raw, latitude, longitude, options).ok_or(Rejection::NoDivision)?;

    let mut incident = Incident::new(
        division,
        occurred_at,
        raw.crime_description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        latitude,
        longitude,
    );
    incident.record_number.clone_from(&raw.record_number);

    Ok((incident, source))
}

/// Picks the division for a row: the `AREA NAME` column, then the
/// containing boundary, then the `AREA` code.
fn resolve_division(
    raw: &RawIncident,
    latitude: f64,
    longitude: f64,
    options: CleanOptions<'_>,
) -> Option<(String, DivisionSource)> {
    let non_blank = |s: &Option<String>| {
        s.as_deref()
            .map(normalize_division)
            .filter(|d| !d.is_empty())
    };

    non_blank(&raw.area_name)
        .map(|d| (d, DivisionSource::Name))
        .or_else(|| {
            options
                .locator
                .and_then(|index| index.lookup(longitude, latitude))
                .map(|d| (d.to_string(), DivisionSource::Location))
        })
        .or_else(|| non_blank(&raw.area).map(|d| (d, DivisionSource::Code)))
}

/// Cleans every row, returning the kept incidents (in input order) and a
/// tally of what was dropped.
#[must_use]
pub fn clean_incidents(
    raw: &[RawIncident],
    options: CleanOptions<'_>,
) -> (Vec<Incident>, CleanReport) {
    let mut report = CleanReport {
        raw: raw.len() as u64,
        ..CleanReport::default()
    };
    let mut incidents = Vec::with_capacity(raw.len());

    for record in raw {
        match clean_row(record, options) {
            Ok((incident, source)) => {
                if source == DivisionSource::Location {
                    report.attributed += 1;
                }
                incidents.push(incident);
            }
            Err(reason) => {
                log::debug!(
                    "Dropping record {}: {reason}",
                    record.record_number.as_deref().unwrap_or("<no DR_NO>")
                );
                report.reject(reason);
            }
        }
    }

    report.kept = incidents.len() as u64;

    log::info!(
        "Cleaned {} raw records: kept {}, dropped {} (not Part 1: {}, bad coordinates: {}, \
         bad date: {}, out of year range: {}, no division: {})",
        report.raw,
        report.kept,
        report.rejected(),
        report.not_part_one,
        report.invalid_coordinates,
        report.unparseable_date,
        report.year_out_of_range,
        report.no_division,
    );

    (incidents, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: RangeInclusive<i32> = 2020..=2024;

    fn options() -> CleanOptions<'static> {
        CleanOptions {
            years: &YEARS,
            locator: None,
        }
    }

    fn raw(part: &str, lat: &str, lon: &str, date: &str) -> RawIncident {
        RawIncident {
            record_number: Some("1".to_string()),
            area_name: Some("77th Street".to_string()),
            area: Some("12".to_string()),
            date_occ: Some(date.to_string()),
            part: Some(part.to_string()),
            crime_description: Some("BURGLARY".to_string()),
            lat: Some(lat.to_string()),
            lon: Some(lon.to_string()),
        }
    }

    #[test]
    fn keeps_valid_part_one_record() {
        let incident = clean_record(
            &raw("1", "33.97", "-118.28", "03/14/2021 12:00:00 AM"),
            options(),
        )
        .unwrap();
        assert_eq!(incident.division, "77TH STREET");
        assert_eq!(incident.year, 2021);
        assert_eq!(incident.description, "BURGLARY");
        assert_eq!(incident.record_number.as_deref(), Some("1"));
        assert!(!incident.is_violent());
    }

    #[test]
    fn rejects_part_two() {
        assert_eq!(
            clean_record(&raw("2", "33.97", "-118.28", "03/14/2021"), options()),
            Err(Rejection::NotPartOne)
        );
        let mut missing = raw("1", "33.97", "-118.28", "03/14/2021");
        missing.part = None;
        assert_eq!(clean_record(&missing, options()), Err(Rejection::NotPartOne));
    }

    #[test]
    fn rejects_zero_coordinates_regardless_of_other_fields() {
        assert_eq!(
            clean_record(&raw("1", "0", "0", "03/14/2021"), options()),
            Err(Rejection::InvalidCoordinates)
        );
        assert_eq!(
            clean_record(&raw("1", "0.0", "-118.28", "03/14/2021"), options()),
            Err(Rejection::InvalidCoordinates)
        );
    }

    #[test]
    fn rejects_unparseable_dates() {
        assert_eq!(
            clean_record(&raw("1", "33.97", "-118.28", "sometime in May"), options()),
            Err(Rejection::UnparseableDate)
        );
    }

    #[test]
    fn rejects_years_outside_range() {
        assert_eq!(
            clean_record(&raw("1", "33.97", "-118.28", "01/01/2025"), options()),
            Err(Rejection::YearOutOfRange)
        );
        assert_eq!(
            clean_record(&raw("1", "33.97", "-118.28", "12/31/2019"), options()),
            Err(Rejection::YearOutOfRange)
        );
    }

    #[test]
    fn falls_back_to_area_code() {
        let mut record = raw("1", "33.97", "-118.28", "03/14/2021");
        record.area_name = Some("  ".to_string());
        let incident = clean_record(&record, options()).unwrap();
        assert_eq!(incident.division, "12");
    }

    #[test]
    fn rejects_records_without_any_division() {
        let mut record = raw("1", "33.97", "-118.28", "03/14/2021");
        record.area_name = None;
        record.area = None;
        assert_eq!(clean_record(&record, options()), Err(Rejection::NoDivision));
    }

    #[test]
    fn attributes_blank_division_from_boundaries() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "APREC": "77TH STREET" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-118.30, 33.95], [-118.25, 33.95], [-118.25, 34.00], [-118.30, 34.00], [-118.30, 33.95]]]
                }
            }]
        }"#;
        let boundaries = crime_dashboard_geography::parse_boundaries(geojson, "APREC").unwrap();
        let index = DivisionIndex::build(&boundaries);

        let mut record = raw("1", "33.97", "-118.28", "03/14/2021");
        record.area_name = None;
        record.area = None;

        let (incidents, report) = clean_incidents(
            &[record],
            CleanOptions {
                years: &YEARS,
                locator: Some(&index),
            },
        );
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].division, "77TH STREET");
        assert_eq!(report.attributed, 1);
    }

    #[test]
    fn only_located_divisions_count_as_attributed() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "APREC": "77TH STREET" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-118.30, 33.95], [-118.25, 33.95], [-118.25, 34.00], [-118.30, 34.00], [-118.30, 33.95]]]
                }
            }]
        }"#;
        let boundaries = crime_dashboard_geography::parse_boundaries(geojson, "APREC").unwrap();
        let index = DivisionIndex::build(&boundaries);
        let options = CleanOptions {
            years: &YEARS,
            locator: Some(&index),
        };

        let named = raw("1", "33.97", "-118.28", "03/14/2021");
        let mut located = named.clone();
        located.area_name = None;
        let mut coded = raw("1", "34.20", "-118.40", "03/14/2021");
        coded.area_name = Some(String::new());

        assert_eq!(
            resolve_division(&named, 33.97, -118.28, options),
            Some(("77TH STREET".to_string(), DivisionSource::Name))
        );
        assert_eq!(
            resolve_division(&located, 33.97, -118.28, options),
            Some(("77TH STREET".to_string(), DivisionSource::Location))
        );
        assert_eq!(
            resolve_division(&coded, 34.20, -118.40, options),
            Some(("12".to_string(), DivisionSource::Code))
        );

        let (incidents, report) = clean_incidents(&[named, located, coded], options);
        assert_eq!(incidents.len(), 3);
        assert_eq!(incidents[2].division, "12");
        assert_eq!(report.attributed, 1);
    }

    #[test]
    fn output_never_contains_zero_coordinates_or_part_two() {
        let records = vec![
            raw("1", "33.97", "-118.28", "03/14/2021"),
            raw("2", "33.97", "-118.28", "03/14/2021"),
            raw("1", "0", "0", "03/14/2021"),
            raw("1.0", "34.01", "-118.30", "2022-06-01"),
            raw("1", "", "-118.30", "2022-06-01"),
            raw("1", "34.01", "-118.30", "garbage"),
        ];
        let (incidents, report) = clean_incidents(&records, options());

        assert_eq!(incidents.len(), 2);
        for incident in &incidents {
            assert!(incident.latitude != 0.0 && incident.longitude != 0.0);
        }
        assert_eq!(report.raw, 6);
        assert_eq!(report.kept, 2);
        assert_eq!(report.not_part_one, 1);
        assert_eq!(report.invalid_coordinates, 2);
        assert_eq!(report.unparseable_date, 1);
        assert_eq!(report.kept + report.rejected(), report.raw);

        // Every kept row came from a Part 1 record.
        for record in &records {
            if let Ok(incident) = clean_record(record, options()) {
                assert_eq!(
                    record.part.as_deref().and_then(parse_ucr_part),
                    Some(UcrPart::PartOne)
                );
                assert!(incidents.contains(&incident));
            }
        }
    }
}
