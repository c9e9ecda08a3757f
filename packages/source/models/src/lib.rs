#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw incident row format and cleaning report types.
//!
//! [`RawIncident`] mirrors the columns of the LAPD "Crime Data from 2020 to
//! Present" CSV that the dashboard reads. Every field is optional and kept
//! as text; validation happens in the cleaning stage, which tallies what it
//! dropped in a [`CleanReport`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Division name column.
pub const COL_AREA_NAME: &str = "AREA NAME";
/// Division code column, used when the name column is absent.
pub const COL_AREA: &str = "AREA";
/// Occurrence date column.
pub const COL_DATE_OCC: &str = "DATE OCC";
/// UCR part column.
pub const COL_PART: &str = "Part 1-2";
/// Crime description column.
pub const COL_CRIME_DESC: &str = "Crm Cd Desc";
/// Latitude column.
pub const COL_LAT: &str = "LAT";
/// Longitude column.
pub const COL_LON: &str = "LON";

/// Columns that must all be present in the CSV header.
pub const REQUIRED_COLUMNS: &[&str] = &[COL_DATE_OCC, COL_PART, COL_CRIME_DESC, COL_LAT, COL_LON];

/// One row of the incident CSV, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIncident {
    /// Division of Records number.
    #[serde(rename = "DR_NO", default)]
    pub record_number: Option<String>,
    /// Division name.
    #[serde(rename = "AREA NAME", default)]
    pub area_name: Option<String>,
    /// Division code.
    #[serde(rename = "AREA", default)]
    pub area: Option<String>,
    /// Occurrence date in one of several formats.
    #[serde(rename = "DATE OCC", default)]
    pub date_occ: Option<String>,
    /// UCR part (`1` or `2`, sometimes written `1.0`).
    #[serde(rename = "Part 1-2", default)]
    pub part: Option<String>,
    /// Crime code description.
    #[serde(rename = "Crm Cd Desc", default)]
    pub crime_description: Option<String>,
    /// Latitude.
    #[serde(rename = "LAT", default)]
    pub lat: Option<String>,
    /// Longitude.
    #[serde(rename = "LON", default)]
    pub lon: Option<String>,
}

/// Why the cleaning stage excluded a record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// Not a Part 1 offense
    NotPartOne,
    /// Latitude/longitude missing, unparseable or zero
    InvalidCoordinates,
    /// Occurrence date matched none of the accepted formats
    UnparseableDate,
    /// Occurrence year outside the dashboard's year range
    YearOutOfRange,
    /// No division name and the point fell outside every boundary
    NoDivision,
}

/// Tally of a cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    /// Records handed to the cleaner.
    pub raw: u64,
    /// Records kept.
    pub kept: u64,
    /// Records dropped as non-Part 1.
    pub not_part_one: u64,
    /// Records dropped for bad coordinates.
    pub invalid_coordinates: u64,
    /// Records dropped for unparseable dates.
    pub unparseable_date: u64,
    /// Records dropped for falling outside the year range.
    pub year_out_of_range: u64,
    /// Records dropped for lacking a division.
    pub no_division: u64,
    /// Kept records whose division came from point-in-polygon lookup.
    pub attributed: u64,
}

impl CleanReport {
    /// Counts one rejected record.
    pub const fn reject(&mut self, reason: Rejection) {
        match reason {
            Rejection::NotPartOne => self.not_part_one += 1,
            Rejection::InvalidCoordinates => self.invalid_coordinates += 1,
            Rejection::UnparseableDate => self.unparseable_date += 1,
            Rejection::YearOutOfRange => self.year_out_of_range += 1,
            Rejection::NoDivision => self.no_division += 1,
        }
    }

    /// Total number of rejected records.
    #[must_use]
    pub const fn rejected(&self) -> u64 {
        self.not_part_one
            + self.invalid_coordinates
            + self.unparseable_date
            + self.year_out_of_range
            + self.no_division
    }
}
