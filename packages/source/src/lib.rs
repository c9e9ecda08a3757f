#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident loading, cleaning and classification.
//!
//! The LAPD incident CSV is read once at startup ([`load`]), filtered down
//! to usable Part 1 records ([`clean`]), and tagged violent or property by
//! keyword ([`classify`]).

pub mod classify;
pub mod clean;
pub mod load;
pub mod parsing;

pub use classify::{classify_description, classify_incidents, is_violent};
pub use clean::{CleanOptions, clean_incidents, clean_record};
pub use load::{LoadedIncidents, load_incidents, read_incidents};

/// Errors that can occur while loading the incident dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The incident file could not be opened.
    #[error("Failed to open incident file {path}: {source}")]
    Io {
        /// File that could not be opened.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks required columns.
    #[error("Incident file is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Names of the missing columns.
        columns: Vec<String>,
    },
}
