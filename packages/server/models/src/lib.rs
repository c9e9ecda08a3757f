#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the crime dashboard server.
//!
//! Interaction events and render payloads are defined next to the
//! controller; this crate only adds the envelopes the HTTP layer needs.

use crime_dashboard_analytics_models::YearFilter;
use crime_dashboard_geography_models::DivisionSummary;
use crime_dashboard_models::{DashboardEvent, RenderPayload};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Cleaned incidents loaded.
    pub incidents: u64,
    /// Division boundaries loaded.
    pub divisions: u64,
}

/// One entry of the year dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOption {
    /// Display label.
    pub label: String,
    /// Filter value posted back in `SELECT_YEAR`.
    pub value: YearFilter,
}

/// Everything the page needs on load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    /// Session id to send back with every [`UpdateRequest`].
    pub session: String,
    /// Page title.
    pub title: String,
    /// Year dropdown options, `All` first.
    pub years: Vec<YearOption>,
    /// Divisions in boundary file order.
    pub divisions: Vec<DivisionSummary>,
    /// Feature property holding the division id in `boundaries`.
    pub division_id_property: String,
    /// Division boundaries.
    pub boundaries: FeatureCollection,
    /// Initial render.
    pub initial: RenderPayload,
}

/// One interaction posted by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Session id from [`LayoutResponse::session`].
    pub session: String,
    /// The interaction.
    pub event: DashboardEvent,
}

/// Error body for refused requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Builds an error body from anything displayable.
    #[must_use]
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
