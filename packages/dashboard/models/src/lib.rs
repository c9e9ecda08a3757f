#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interaction state, events and render payloads for the dashboard.
//!
//! These types are serialized to JSON for the browser. The client posts a
//! [`DashboardEvent`] per interaction and receives a [`RenderPayload`]
//! carrying the new [`DashboardState`] plus whatever parts of the page
//! changed.

use crime_dashboard_analytics_models::{CategoryCount, YearFilter};
use crime_dashboard_crime_models::CrimeClass;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How the drill-down ranking is shown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Sorted table of descriptions and counts
    #[default]
    Table,
    /// Pie chart of the leading descriptions
    Pie,
}

/// Which map layers are visible.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MapLayer {
    /// Division choropleth only
    #[default]
    Choropleth,
    /// Incident density (hotspots) only
    Density,
    /// Both layers
    Both,
}

impl MapLayer {
    /// Whether the choropleth layer is visible.
    #[must_use]
    pub const fn shows_choropleth(self) -> bool {
        matches!(self, Self::Choropleth | Self::Both)
    }

    /// Whether the density layer is visible.
    #[must_use]
    pub const fn shows_density(self) -> bool {
        matches!(self, Self::Density | Self::Both)
    }
}

/// Current interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Selected division, `None` for the citywide view.
    pub selected_division: Option<String>,
    /// Drill-down view mode.
    pub view_mode: ViewMode,
    /// Year filter.
    pub year: YearFilter,
    /// Visible map layers.
    pub map_layer: MapLayer,
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// The year dropdown changed.
    SelectYear {
        /// New year filter.
        year: YearFilter,
    },
    /// A division was clicked on the map. `None` when the click carried no
    /// location.
    ClickDivision {
        /// Clicked division identifier.
        division: Option<String>,
    },
    /// Return to the citywide view.
    ClearSelection,
    /// The table/pie toggle changed.
    SetViewMode {
        /// New view mode.
        mode: ViewMode,
    },
    /// The map layer toggle changed.
    SetMapLayer {
        /// New layer selection.
        layer: MapLayer,
    },
}

/// Map display settings passed through to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    /// Initial map centre latitude.
    pub center_lat: f64,
    /// Initial map centre longitude.
    pub center_lon: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Map height in pixels.
    pub height: u32,
    /// Choropleth fill opacity.
    pub opacity: f64,
    /// Plotly colour scale name.
    pub color_scale: String,
    /// Density layer point radius.
    pub density_radius: u32,
}

/// Choropleth value for one division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethValue {
    /// Normalized division identifier (matches the boundary feature).
    pub division: String,
    /// Division display name.
    pub name: String,
    /// Total incidents.
    pub total: u64,
    /// Violent incidents.
    pub violent: u64,
    /// Violent ratio, `None` when the division has no incidents.
    pub violent_ratio: Option<f64>,
    /// Colour value: the violent ratio, or `0.0` without data.
    pub value: f64,
    /// Whether the division had any incidents.
    pub has_data: bool,
    /// Leading crime descriptions for the hover card.
    pub top_categories: Vec<CategoryCount>,
}

/// Choropleth layer for one year filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethPayload {
    /// Year filter the values were computed under.
    pub year: YearFilter,
    /// One value per boundary division, in boundary file order.
    pub values: Vec<ChoroplethValue>,
    /// Upper end of the colour range (at least a small positive value).
    pub range_max: f64,
}

/// One sampled incident for the density layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Density weight: `1` for violent incidents, `0` otherwise.
    pub weight: u8,
    /// Division identifier.
    pub division: String,
    /// Crime description.
    pub description: String,
}

/// Density layer for one year filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotPayload {
    /// Year filter the sample was drawn under.
    pub year: YearFilter,
    /// Incidents matching the year filter before sampling.
    pub population: u64,
    /// Sampled points.
    pub points: Vec<HotspotPoint>,
}

/// Everything the client needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPayload {
    /// Visible layers.
    pub layer: MapLayer,
    /// Choropleth layer, present when visible.
    pub choropleth: Option<ChoroplethPayload>,
    /// Density layer, present when visible.
    pub hotspots: Option<HotspotPayload>,
    /// Display settings.
    pub settings: MapSettings,
}

/// One row of the ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    /// Crime description.
    pub description: String,
    /// Incident count.
    pub count: u64,
    /// Violent or property.
    pub category: CrimeClass,
}

/// One pie chart slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    /// Slice label.
    pub label: String,
    /// Slice value.
    pub value: u64,
}

/// Drill-down body in the active view mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrillDownView {
    /// Sorted ranking table.
    Table {
        /// Rows by descending count.
        rows: Vec<RankingRow>,
    },
    /// Pie chart slices.
    Pie {
        /// Slices by descending value, any remainder last.
        slices: Vec<PieSlice>,
    },
}

/// Drill-down panel for the selected division (or citywide).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDownPayload {
    /// Panel title.
    pub title: String,
    /// Division shown, `None` for citywide.
    pub division: Option<String>,
    /// Year filter.
    pub year: YearFilter,
    /// Total incidents behind the ranking.
    pub total: u64,
    /// Violent incidents behind the ranking.
    pub violent: u64,
    /// `violent / total`, `None` when the ranking is empty.
    pub violent_ratio: Option<f64>,
    /// Ranking in the active view mode.
    pub view: DrillDownView,
}

/// Response to one interaction (or the initial page layout).
///
/// `map` and `drill_down` are `None` when the interaction left that part
/// of the page untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    /// State after the interaction.
    pub state: DashboardState,
    /// Map update.
    pub map: Option<MapPayload>,
    /// Drill-down update.
    pub drill_down: Option<DrillDownPayload>,
    /// Informational message (e.g. a fallback to the citywide view).
    pub notice: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_defaults() {
        let state = DashboardState::default();
        assert_eq!(state.selected_division, None);
        assert_eq!(state.view_mode, ViewMode::Table);
        assert_eq!(state.year, YearFilter::All);
        assert_eq!(state.map_layer, MapLayer::Choropleth);
    }

    #[test]
    fn events_deserialize_from_client_json() {
        let event: DashboardEvent =
            serde_json::from_str(r#"{"type":"SELECT_YEAR","year":2022}"#).unwrap();
        assert_eq!(
            event,
            DashboardEvent::SelectYear {
                year: YearFilter::Year(2022)
            }
        );

        let event: DashboardEvent =
            serde_json::from_str(r#"{"type":"SELECT_YEAR","year":"ALL"}"#).unwrap();
        assert_eq!(event, DashboardEvent::SelectYear { year: YearFilter::All });

        let event: DashboardEvent =
            serde_json::from_str(r#"{"type":"CLICK_DIVISION","division":"CENTRAL"}"#).unwrap();
        assert_eq!(
            event,
            DashboardEvent::ClickDivision {
                division: Some("CENTRAL".to_string())
            }
        );

        let event: DashboardEvent =
            serde_json::from_str(r#"{"type":"SET_VIEW_MODE","mode":"PIE"}"#).unwrap();
        assert_eq!(event, DashboardEvent::SetViewMode { mode: ViewMode::Pie });

        let event: DashboardEvent = serde_json::from_str(r#"{"type":"CLEAR_SELECTION"}"#).unwrap();
        assert_eq!(event, DashboardEvent::ClearSelection);
    }

    #[test]
    fn layer_visibility() {
        assert!(MapLayer::Choropleth.shows_choropleth());
        assert!(!MapLayer::Choropleth.shows_density());
        assert!(MapLayer::Both.shows_choropleth() && MapLayer::Both.shows_density());
        assert!(!MapLayer::Density.shows_choropleth());
    }
}
