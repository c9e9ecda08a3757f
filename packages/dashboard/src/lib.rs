#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! LA crime dashboard core.
//!
//! Loads the dataset into a [`DashboardContext`], renders map and
//! drill-down payloads ([`presenter`]), and drives interactions through a
//! per-session state machine ([`controller`]). The HTTP layer lives in the
//! server crate.

pub mod config;
pub mod context;
pub mod controller;
pub mod presenter;

pub use config::{ConfigError, DashboardConfig};
pub use context::DashboardContext;
pub use controller::{InteractionError, Session, transition};

/// Errors that stop the dashboard from starting.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Configuration is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The incident CSV could not be loaded.
    #[error(transparent)]
    Source(#[from] crime_dashboard_source::SourceError),

    /// The boundary file could not be loaded.
    #[error(transparent)]
    Geography(#[from] crime_dashboard_geography::GeographyError),
}
