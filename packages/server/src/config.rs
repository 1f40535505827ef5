//! Server configuration.
//!
//! Resolved in three layers: built-in defaults, then an optional TOML file
//! named by `CAMPUS_INCIDENTS_CONFIG`, then individual environment
//! variables (`BIND_ADDR`, `PORT`, `INCIDENTS_SEED`, `DENSITY_CELL_SIZE`,
//! `CLUSTER_RADIUS_METERS`, `DUPLICATE_WINDOW_HOURS`).

use std::path::{Path, PathBuf};

use campus_incidents_database_models::{
    DEFAULT_DUPLICATE_WINDOW_HOURS, duplicate_window_duration,
};
use campus_incidents_geo::{
    DEFAULT_CELL_SIZE_DEGREES, DEFAULT_CLUSTER_RADIUS_METERS, is_valid_cell_size,
};
use chrono::Duration;
use serde::Deserialize;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "CAMPUS_INCIDENTS_CONFIG";

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ServerConfig`].
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable held an unusable value.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Settings for the HTTP server and the map/duplicate defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Optional JSON file of incidents to pre-load.
    pub seed_path: Option<PathBuf>,
    /// Default heatmap cell size in degrees.
    pub density_cell_size: f64,
    /// Default cluster radius in meters.
    pub cluster_radius_meters: f64,
    /// How many hours back the duplicate window reaches.
    pub duplicate_window_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            seed_path: None,
            density_cell_size: DEFAULT_CELL_SIZE_DEGREES,
            cluster_radius_meters: DEFAULT_CLUSTER_RADIUS_METERS,
            duplicate_window_hours: DEFAULT_DUPLICATE_WINDOW_HOURS,
        }
    }
}

impl ServerConfig {
    /// Resolves configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or the resolved configuration holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Toml`].
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded server config from {}", path.display());
        Self::parse_toml(&text)
    }

    /// Parses TOML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is malformed, or
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn parse_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from variables returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unparseable numbers or
    /// out-of-range values.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(seed) = lookup("INCIDENTS_SEED") {
            self.seed_path = Some(PathBuf::from(seed));
        }
        if let Some(cell_size) = parse_var(&lookup, "DENSITY_CELL_SIZE")? {
            self.density_cell_size = cell_size;
        }
        if let Some(radius) = parse_var(&lookup, "CLUSTER_RADIUS_METERS")? {
            self.cluster_radius_meters = radius;
        }
        if let Some(hours) = parse_var(&lookup, "DUPLICATE_WINDOW_HOURS")? {
            self.duplicate_window_hours = hours;
        }
        self.validate()
    }

    /// Checks every numeric setting is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_cell_size(self.density_cell_size) {
            return Err(invalid(
                "density_cell_size",
                &self.density_cell_size.to_string(),
            ));
        }
        if !is_valid_radius(self.cluster_radius_meters) {
            return Err(invalid(
                "cluster_radius_meters",
                &self.cluster_radius_meters.to_string(),
            ));
        }
        if duplicate_window_duration(self.duplicate_window_hours).is_none() {
            return Err(invalid(
                "duplicate_window_hours",
                &self.duplicate_window_hours.to_string(),
            ));
        }
        Ok(())
    }

    /// The duplicate window length, or `None` if the setting is invalid.
    #[must_use]
    pub fn duplicate_window(&self) -> Option<Duration> {
        duplicate_window_duration(self.duplicate_window_hours)
    }
}

/// Whether `radius` is usable as a cluster radius in meters.
pub(crate) fn is_valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius > 0.0
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| value.trim().parse().map_err(|_| invalid(key, &value)))
        .transpose()
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
