use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::GeoCoordinate;
use crate::observer::Observer;
use crate::satellite::GeoSatellite;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: ObserverConfig,
    pub display: DisplayConfig,
    pub guidance: GuidanceConfig,
    pub database: DatabaseConfig,
    pub satellites: Vec<SatelliteConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_rate: u64, // milliseconds
    pub show_below_horizon: bool,
    pub show_sky_map: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub on_target_tolerance: f64, // degrees
    pub heading_step: f64,        // degrees per key press
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct SatelliteConfig {
    pub name: String,
    pub longitude: f64,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "Custom".to_string()
}

// Greenwich until the user configures a home location
impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            name: "Greenwich".to_string(),
            latitude: 51.4779,
            longitude: -0.0015,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_rate: 250,
            show_below_horizon: false,
            show_sky_map: true,
        }
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            on_target_tolerance: 2.0,
            heading_step: 1.0,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the default location; a missing
    /// default file yields the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        GeoCoordinate::new(self.observer.latitude, self.observer.longitude)
            .context("invalid [observer] location")?;
        self.custom_satellites()?;
        if !(self.guidance.on_target_tolerance > 0.0) {
            anyhow::bail!("guidance.on_target_tolerance must be positive");
        }
        if !(self.guidance.heading_step > 0.0) {
            anyhow::bail!("guidance.heading_step must be positive");
        }
        Ok(())
    }

    pub fn observer(&self) -> Result<Observer> {
        Ok(Observer::new(
            self.observer.name.clone(),
            self.observer.latitude,
            self.observer.longitude,
        )?)
    }

    pub fn custom_satellites(&self) -> Result<Vec<GeoSatellite>> {
        self.satellites
            .iter()
            .map(|s| {
                GeoSatellite::new(s.name.clone(), s.longitude, s.region.clone())
                    .with_context(|| format!("invalid satellite entry '{}'", s.name))
            })
            .collect()
    }

    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.path.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("dishpoint").join("locations.duckdb"))
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dishpoint").join("config.toml"))
}
