//! Dashboard configuration.
//!
//! Every setting has a default matching the LAPD release, so the dashboard
//! runs without a config file. An optional `dashboard.toml` in the working
//! directory overrides any subset of fields.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crime_dashboard_models::MapSettings;
use serde::Deserialize;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Errors raised while reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Config file path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `first_year` is after `last_year`.
    #[error("Invalid year range {first}..={last}")]
    InvalidYears {
        /// First year.
        first: i32,
        /// Last year.
        last: i32,
    },

    /// A presentation setting is out of range.
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Incident CSV path.
    pub incidents_path: PathBuf,
    /// Division boundary `GeoJSON` path.
    pub boundaries_path: PathBuf,
    /// Feature property holding the division name.
    pub boundary_id_property: String,
    /// First year kept by the cleaner.
    pub first_year: i32,
    /// Last year kept by the cleaner.
    pub last_year: i32,
    /// Attribute rows with a blank division name by point-in-polygon lookup.
    pub attribute_missing_divisions: bool,
    /// Ranking and chart settings.
    pub presentation: PresentationConfig,
    /// Map settings.
    pub map: MapConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            incidents_path: PathBuf::from("Crime_Data_from_2020_to_Present.csv"),
            boundaries_path: PathBuf::from("LAPD_Division_5922489107755548254.geojson"),
            boundary_id_property: "APREC".to_string(),
            first_year: 2020,
            last_year: 2024,
            attribute_missing_divisions: true,
            presentation: PresentationConfig::default(),
            map: MapConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Ranking and chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// Row cap for the ranking table; unlimited when absent.
    pub table_rows: Option<usize>,
    /// Named pie slices before the rest collapse into [`OTHER_SLICE_LABEL`].
    ///
    /// [`OTHER_SLICE_LABEL`]: crate::presenter::OTHER_SLICE_LABEL
    pub pie_slices: usize,
    /// Descriptions listed in each division's map hover card.
    pub hover_categories: usize,
    /// Maximum points drawn by the density layer.
    pub hotspot_limit: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            table_rows: None,
            pie_slices: 10,
            hover_categories: 3,
            hotspot_limit: 120_000,
        }
    }
}

/// Map appearance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Initial centre latitude.
    pub center_lat: f64,
    /// Initial centre longitude.
    pub center_lon: f64,
    /// Initial zoom.
    pub zoom: f64,
    /// Height in pixels.
    pub height: u32,
    /// Choropleth opacity in `0.0..=1.0`.
    pub opacity: f64,
    /// Plotly colour scale name.
    pub color_scale: String,
    /// Density point radius in pixels.
    pub density_radius: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 34.05,
            center_lon: -118.25,
            zoom: 9.0,
            height: 650,
            opacity: 0.45,
            color_scale: "Reds".to_string(),
            density_radius: 5,
        }
    }
}

impl From<&MapConfig> for MapSettings {
    fn from(value: &MapConfig) -> Self {
        Self {
            center_lat: value.center_lat,
            center_lon: value.center_lon,
            zoom: value.zoom,
            height: value.height,
            opacity: value.opacity,
            color_scale: value.color_scale.clone(),
            density_radius: value.density_radius,
        }
    }
}

/// HTTP listener settings. `BIND_ADDR` and `PORT` override these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Open page sessions kept before the least recently used is dropped.
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8050,
            max_sessions: 32,
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out of
    /// range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, or the defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but can't be read, parsed
    /// or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        log::info!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// Inclusive range of years kept by the cleaner.
    #[must_use]
    pub const fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_year > self.last_year {
            return Err(ConfigError::InvalidYears {
                first: self.first_year,
                last: self.last_year,
            });
        }
        if self.presentation.pie_slices == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "presentation.pie_slices",
                reason: "must be at least 1",
            });
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "server.max_sessions",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.map.opacity) {
            return Err(ConfigError::InvalidSetting {
                name: "map.opacity",
                reason: "must be between 0 and 1",
            });
        }
        if self.boundary_id_property.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "boundary_id_property",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
