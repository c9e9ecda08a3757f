#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record and violent-crime taxonomy types.
//!
//! This crate defines the cleaned [`Incident`] record shared by every stage
//! of the dashboard pipeline, the UCR part classification used to filter
//! serious offenses, and the violent-crime categories assigned by the
//! keyword classifier.

use chrono::{Datelike as _, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// UCR hierarchy tier of an offense.
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
pub enum UcrPart {
    /// Part 1: serious offenses (homicide, rape, robbery, aggravated
    /// assault, burglary, theft, motor vehicle theft, arson)
    PartOne = 1,
    /// Part 2: all other reportable offenses
    PartTwo = 2,
}

impl UcrPart {
    /// Returns the numeric value of this part.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a part from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not 1 or 2.
    pub const fn from_value(value: u8) -> Result<Self, InvalidUcrPartError> {
        match value {
            1 => Ok(Self::PartOne),
            2 => Ok(Self::PartTwo),
            _ => Err(InvalidUcrPartError { value }),
        }
    }
}

/// Error returned when attempting to create a [`UcrPart`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidUcrPartError {
    /// The invalid part value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidUcrPartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid UCR part {}: expected 1 or 2", self.value)
    }
}

impl std::error::Error for InvalidUcrPartError {}

/// Violent-crime families recognized by the keyword classifier.
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
pub enum ViolentCategory {
    /// Any assault, aggravated or simple
    Assault,
    /// Taking property by force or threat
    Robbery,
    /// Criminal homicide and manslaughter
    Homicide,
    /// Rape and other forcible sexual offenses
    SexualAssault,
    /// Brandishing a weapon or discharging a firearm
    WeaponThreat,
}

impl ViolentCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Assault,
            Self::Robbery,
            Self::Homicide,
            Self::SexualAssault,
            Self::WeaponThreat,
        ]
    }
}

/// Coarse violent/property split shown next to each ranked description.
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
pub enum CrimeClass {
    /// Matched one of the violent-crime keywords
    Violent,
    /// Every other Part 1 offense
    Property,
}

impl CrimeClass {
    /// Returns the class for a violent flag.
    #[must_use]
    pub const fn from_violent(violent: bool) -> Self {
        if violent { Self::Violent } else { Self::Property }
    }

    /// Whether this is the violent class.
    #[must_use]
    pub const fn is_violent(self) -> bool {
        matches!(self, Self::Violent)
    }
}

/// A cleaned and classified crime incident.
///
/// Only records that passed the Part 1, coordinate, date and year checks
/// are ever represented as an `Incident`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Source record number (`DR_NO`), if present.
    pub record_number: Option<String>,
    /// Normalized division identifier (trimmed, upper-case).
    pub division: String,
    /// When the crime occurred.
    pub occurred_at: NaiveDateTime,
    /// Year of `occurred_at`.
    pub year: i32,
    /// Crime description (`Crm Cd Desc`), used as the ranking category.
    pub description: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Violent family this incident was matched to, `None` for property
    /// crimes.
    pub violent_category: Option<ViolentCategory>,
}

impl Incident {
    /// Creates an unclassified incident; `year` is derived from
    /// `occurred_at`.
    #[must_use]
    pub fn new(
        division: String,
        occurred_at: NaiveDateTime,
        description: String,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            record_number: None,
            division,
            year: occurred_at.year(),
            occurred_at,
            description,
            latitude,
            longitude,
            violent_category: None,
        }
    }

    /// Whether the classifier tagged this incident as violent.
    #[must_use]
    pub const fn is_violent(&self) -> bool {
        self.violent_category.is_some()
    }

    /// Violent/property class of this incident.
    #[must_use]
    pub const fn class(&self) -> CrimeClass {
        CrimeClass::from_violent(self.is_violent())
    }
}

/// Normalizes a division identifier for joining incidents to boundaries.
#[must_use]
pub fn normalize_division(raw: &str) -> String {
    raw.trim().to_uppercase()
}
