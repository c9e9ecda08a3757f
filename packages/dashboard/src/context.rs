//! Immutable data the dashboard serves from.
//!
//! Built once at startup: boundaries are loaded and indexed, the incident
//! CSV is read, cleaned and classified. Nothing here changes afterwards,
//! so the context is shared freely between request handlers.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crime_dashboard_analytics_models::YearFilter;
use crime_dashboard_crime_models::{Incident, normalize_division};
use crime_dashboard_geography_models::BoundarySet;
use crime_dashboard_models::MapSettings;
use crime_dashboard_source::{CleanOptions, classify_incidents, clean_incidents};
use crime_dashboard_source_models::{CleanReport, RawIncident};
use crime_dashboard_spatial::DivisionIndex;

use crate::DashboardError;
use crate::config::{DashboardConfig, PresentationConfig};

/// Loaded, cleaned and classified dataset plus presentation settings.
#[derive(Debug)]
pub struct DashboardContext {
    incidents: Vec<Incident>,
    boundaries: BoundarySet,
    divisions: BTreeSet<String>,
    years: RangeInclusive<i32>,
    report: CleanReport,
    presentation: PresentationConfig,
    map: MapSettings,
}

impl DashboardContext {
    /// Loads every input named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if either input file is missing or
    /// malformed.
    pub fn load(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let boundaries = crime_dashboard_geography::load_boundaries(
            &config.boundaries_path,
            &config.boundary_id_property,
        )?;
        log::info!("Loaded {} division boundaries", boundaries.len());

        let loaded = crime_dashboard_source::load_incidents(&config.incidents_path)?;

        Ok(Self::from_records(&loaded.records, boundaries, config))
    }

    /// Cleans and classifies already-read rows against `boundaries`.
    #[must_use]
    pub fn from_records(
        records: &[RawIncident],
        boundaries: BoundarySet,
        config: &DashboardConfig,
    ) -> Self {
        let years = config.years();
        let index = config
            .attribute_missing_divisions
            .then(|| DivisionIndex::build(&boundaries));

        let (mut incidents, report) = clean_incidents(
            records,
            CleanOptions {
                years: &years,
                locator: index.as_ref(),
            },
        );
        classify_incidents(&mut incidents);

        let violent = incidents.iter().filter(|i| i.is_violent()).count();
        log::info!(
            "{} incidents ready ({violent} violent, {} attributed by location)",
            incidents.len(),
            report.attributed
        );

        let divisions: BTreeSet<String> = boundaries
            .ids()
            .map(str::to_string)
            .chain(incidents.iter().map(|i| i.division.clone()))
            .collect();

        for division in divisions.iter().filter(|d| !boundaries.contains(d)) {
            log::warn!("Division {division} has incidents but no boundary; it won't be drawn");
        }

        Self {
            incidents,
            boundaries,
            divisions,
            years,
            report,
            presentation: config.presentation.clone(),
            map: MapSettings::from(&config.map),
        }
    }

    /// Cleaned, classified incidents in CSV order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Division boundaries.
    #[must_use]
    pub const fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    /// Inclusive year range of the dataset.
    #[must_use]
    pub const fn years(&self) -> &RangeInclusive<i32> {
        &self.years
    }

    /// Cleaning tally.
    #[must_use]
    pub const fn report(&self) -> &CleanReport {
        &self.report
    }

    /// Ranking and chart settings.
    #[must_use]
    pub const fn presentation(&self) -> &PresentationConfig {
        &self.presentation
    }

    /// Map settings.
    #[must_use]
    pub const fn map_settings(&self) -> &MapSettings {
        &self.map
    }

    /// Every year filter offered by the year dropdown: `All` first, then
    /// each year ascending.
    #[must_use]
    pub fn year_options(&self) -> Vec<YearFilter> {
        std::iter::once(YearFilter::All)
            .chain(self.years.clone().map(YearFilter::Year))
            .collect()
    }

    /// Whether a year filter is within the dataset's range.
    #[must_use]
    pub fn accepts_year(&self, year: YearFilter) -> bool {
        match year {
            YearFilter::All => true,
            YearFilter::Year(y) => self.years.contains(&y),
        }
    }

    /// Resolves a division name from the client to a known division id.
    ///
    /// Known divisions are the boundary ids plus every division that has
    /// incidents.
    #[must_use]
    pub fn resolve_division(&self, raw: &str) -> Option<String> {
        let normalized = normalize_division(raw);
        self.divisions.contains(&normalized).then_some(normalized)
    }

    /// Display name for a division: the boundary file's name if there is a
    /// boundary, otherwise the id.
    #[must_use]
    pub fn division_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.boundaries.get(id).map_or(id, |b| b.name.as_str())
    }
}
