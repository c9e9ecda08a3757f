#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate and ranking types produced by the analytics engine.
//!
//! A [`DivisionYearAggregate`] summarizes every incident of one division
//! under one [`YearFilter`]. Aggregates are recomputed on demand and never
//! persisted.

use std::ops::RangeInclusive;

use crime_dashboard_crime_models::CrimeClass;
use serde::{Deserialize, Serialize};

/// Year restriction applied to an aggregation.
///
/// Serializes as the string `"ALL"` or a bare year number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "YearFilterRepr", into = "YearFilterRepr")]
pub enum YearFilter {
    /// No year restriction.
    #[default]
    All,
    /// Only incidents that occurred in this year.
    Year(i32),
}

impl YearFilter {
    /// Whether an incident from `year` passes this filter.
    #[must_use]
    pub const fn matches(self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Year(y) => y == year,
        }
    }

    /// Human-readable label, e.g. `All (2020–2024)` or `2021`.
    #[must_use]
    pub fn label(self, years: &RangeInclusive<i32>) -> String {
        match self {
            Self::All => format!("All ({}–{})", years.start(), years.end()),
            Self::Year(y) => y.to_string(),
        }
    }

    /// Parenthesized title suffix, e.g. `All 2020–2024` or `2021`.
    #[must_use]
    pub fn title_suffix(self, years: &RangeInclusive<i32>) -> String {
        match self {
            Self::All => format!("All {}–{}", years.start(), years.end()),
            Self::Year(y) => y.to_string(),
        }
    }
}

/// Wire representation of a [`YearFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearFilterRepr {
    /// A bare year number.
    Year(i32),
    /// `"ALL"` or a year written as a string.
    Text(String),
}

/// Error returned when a year filter string is neither `ALL` nor a year.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year filter '{0}': expected \"ALL\" or a year")]
pub struct InvalidYearFilterError(pub String);

impl TryFrom<YearFilterRepr> for YearFilter {
    type Error = InvalidYearFilterError;

    fn try_from(value: YearFilterRepr) -> Result<Self, Self::Error> {
        match value {
            YearFilterRepr::Year(y) => Ok(Self::Year(y)),
            YearFilterRepr::Text(s) => {
                let trimmed = s.trim();
                if trimmed.eq_ignore_ascii_case("all") {
                    Ok(Self::All)
                } else {
                    trimmed
                        .parse::<i32>()
                        .map(Self::Year)
                        .map_err(|_| InvalidYearFilterError(s))
                }
            }
        }
    }
}

impl From<YearFilter> for YearFilterRepr {
    fn from(value: YearFilter) -> Self {
        match value {
            YearFilter::All => Self::Text("ALL".to_string()),
            YearFilter::Year(y) => Self::Year(y),
        }
    }
}

/// Incident count for one crime description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Crime description (`Crm Cd Desc`).
    pub description: String,
    /// Number of incidents.
    pub count: u64,
    /// Violent or property.
    pub class: CrimeClass,
}

/// Summary of one division under one year filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionYearAggregate {
    /// Normalized division identifier.
    pub division: String,
    /// Year filter the aggregate was computed under.
    pub year: YearFilter,
    /// Total incident count.
    pub total: u64,
    /// Violent incident count.
    pub violent: u64,
    /// `violent / total`, `None` when `total` is zero.
    pub violent_ratio: Option<f64>,
    /// Crime descriptions by descending frequency, ties in first-seen order.
    pub top_categories: Vec<CategoryCount>,
}

impl DivisionYearAggregate {
    /// An aggregate for a division with no incidents.
    #[must_use]
    pub const fn empty(division: String, year: YearFilter) -> Self {
        Self {
            division,
            year,
            total: 0,
            violent: 0,
            violent_ratio: None,
            top_categories: Vec::new(),
        }
    }

    /// The violent ratio, or `0.0` when there is no data.
    #[must_use]
    pub fn ratio_or_zero(&self) -> f64 {
        self.violent_ratio.unwrap_or(0.0)
    }
}

/// Computes `violent / total`, `None` for an empty total.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn violent_ratio(violent: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some((violent as f64 / total as f64).clamp(0.0, 1.0))
    }
}
