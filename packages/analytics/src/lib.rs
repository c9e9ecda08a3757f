#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-division aggregation and crime-type ranking.
//!
//! Every function here is a pure function of an incident slice and a
//! [`YearFilter`]. Rankings order crime descriptions by descending count;
//! descriptions with equal counts keep the order in which they were first
//! encountered in the incident sequence (CSV row order).

use std::collections::BTreeMap;

use crime_dashboard_analytics_models::{
    CategoryCount, DivisionYearAggregate, YearFilter, violent_ratio,
};
use crime_dashboard_crime_models::{CrimeClass, Incident};

/// Running tally for one crime description.
struct Tally {
    first_seen: usize,
    count: u64,
    class: CrimeClass,
}

/// Ranks crime descriptions by frequency.
///
/// `limit` caps the number of entries returned; `None` returns every
/// description.
#[must_use]
pub fn rank_categories<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    limit: Option<usize>,
) -> Vec<CategoryCount> {
    let mut tallies: BTreeMap<&'a str, Tally> = BTreeMap::new();

    for incident in incidents {
        let next = tallies.len();
        tallies
            .entry(incident.description.as_str())
            .or_insert_with(|| Tally {
                first_seen: next,
                count: 0,
                class: incident.class(),
            })
            .count += 1;
    }

    let mut ranked: Vec<(&str, Tally)> = tallies.into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });

    ranked
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(description, tally)| CategoryCount {
            description: description.to_string(),
            count: tally.count,
            class: tally.class,
        })
        .collect()
}

/// Ranks crime descriptions for one division, or citywide when `division`
/// is `None`, under a year filter.
#[must_use]
pub fn rank_for(
    incidents: &[Incident],
    year: YearFilter,
    division: Option<&str>,
    limit: Option<usize>,
) -> Vec<CategoryCount> {
    rank_categories(
        incidents
            .iter()
            .filter(|i| year.matches(i.year))
            .filter(|i| division.is_none_or(|d| i.division == d)),
        limit,
    )
}

/// Aggregates incidents by division under a year filter.
///
/// Only divisions with at least one matching incident appear. Output is
/// ordered by division identifier. `top_n` caps each division's ranking.
#[must_use]
pub fn aggregate_divisions(
    incidents: &[Incident],
    year: YearFilter,
    top_n: Option<usize>,
) -> Vec<DivisionYearAggregate> {
    let mut by_division: BTreeMap<&str, Vec<&Incident>> = BTreeMap::new();

    for incident in incidents.iter().filter(|i| year.matches(i.year)) {
        by_division
            .entry(incident.division.as_str())
            .or_default()
            .push(incident);
    }

    let aggregates: Vec<DivisionYearAggregate> = by_division
        .into_iter()
        .map(|(division, group)| {
            let total = group.len() as u64;
            let violent = group.iter().filter(|i| i.is_violent()).count() as u64;
            DivisionYearAggregate {
                division: division.to_string(),
                year,
                total,
                violent,
                violent_ratio: violent_ratio(violent, total),
                top_categories: rank_categories(group, top_n),
            }
        })
        .collect();

    log::debug!(
        "Aggregated {} divisions for year filter {year:?}",
        aggregates.len()
    );

    aggregates
}

/// Aggregates for one division under a year filter; an empty aggregate if
/// the division has no matching incidents.
#[must_use]
pub fn aggregate_division(
    incidents: &[Incident],
    year: YearFilter,
    division: &str,
    top_n: Option<usize>,
) -> DivisionYearAggregate {
    let group: Vec<&Incident> = incidents
        .iter()
        .filter(|i| i.division == division && year.matches(i.year))
        .collect();

    let total = group.len() as u64;
    let violent = group.iter().filter(|i| i.is_violent()).count() as u64;

    DivisionYearAggregate {
        division: division.to_string(),
        year,
        total,
        violent,
        violent_ratio: violent_ratio(violent, total),
        top_categories: rank_categories(group, top_n),
    }
}

/// Result of joining aggregates onto a fixed list of divisions.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionJoin {
    /// One aggregate per requested division, in request order. Divisions
    /// without incidents get an empty aggregate.
    pub matched: Vec<DivisionYearAggregate>,
    /// Aggregates whose division was not requested.
    pub unmatched: Vec<DivisionYearAggregate>,
}

/// Joins aggregates onto `divisions`, filling in empty aggregates for
/// divisions with no incidents.
#[must_use]
pub fn ensure_divisions<'a>(
    aggregates: Vec<DivisionYearAggregate>,
    divisions: impl IntoIterator<Item = &'a str>,
    year: YearFilter,
) -> DivisionJoin {
    let mut by_division: BTreeMap<String, DivisionYearAggregate> = aggregates
        .into_iter()
        .map(|agg| (agg.division.clone(), agg))
        .collect();

    let matched = divisions
        .into_iter()
        .map(|id| {
            by_division
                .remove(id)
                .unwrap_or_else(|| DivisionYearAggregate::empty(id.to_string(), year))
        })
        .collect();

    DivisionJoin {
        matched,
        unmatched: by_division.into_values().collect(),
    }
}
