use serde::Serialize;

use crate::error::{GeometryError, RegistryError};
use crate::geometry::{calculate_all, normalize_longitude, GeoCoordinate, PointingSolution};

/// Two registry entries closer than this are the same orbital slot.
const SLOT_TOLERANCE_DEG: f64 = 0.05;

const BUILTIN_SATELLITES: &[(&str, f64, &str)] = &[
    ("Hot Bird 13E", 13.0, "Europe"),
    ("Astra 1KR/1L/1M/1N", 19.2, "Europe"),
    ("Astra 3B/3C", 23.5, "Europe"),
    ("Astra 2E/2F/2G", 28.2, "Europe"),
    ("Eutelsat 9B", 9.0, "Europe"),
    ("Eutelsat 16A", 16.0, "Europe"),
    ("Thor 5/6/7", -0.8, "Europe"),
    ("Hispasat 30W-5", -30.0, "Europe"),
    ("Turksat 4A", 42.0, "Europe"),
    ("Nilesat 201", -7.0, "MENA"),
    ("Eutelsat 7 West A", -7.3, "MENA"),
    ("Arabsat 5C", 20.0, "MENA"),
    ("Badr 4/5/6/7", 26.0, "MENA"),
    ("Es'hail 2", 25.9, "MENA"),
    ("Yahsat 1A", 52.5, "MENA"),
    ("SES-5", 5.0, "Africa"),
    ("Intelsat 20", 68.5, "Africa"),
    ("AsiaSat 5", 100.5, "Asia"),
    ("JCSAT-3A", 128.0, "Asia"),
    ("Optus C1/D3", 156.0, "Oceania"),
    ("Optus D1", 160.0, "Oceania"),
    ("Amazonas Nexus", -61.0, "Americas"),
    ("Star One C2", -70.0, "Americas"),
    ("Galaxy 19", -97.0, "Americas"),
    ("SES-1", -101.0, "Americas"),
];

/// A satellite parked on the geostationary arc. Only the orbital longitude
/// matters for pointing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSatellite {
    pub name: String,
    /// East-positive, normalized to (-180, 180].
    pub longitude: f64,
    pub region: String,
}

impl GeoSatellite {
    pub fn new(name: String, longitude: f64, region: String) -> Result<Self, GeometryError> {
        if !(-180.0..360.0).contains(&longitude) {
            return Err(GeometryError::SatelliteLongitudeOutOfRange(longitude));
        }
        Ok(Self {
            name,
            longitude: normalize_longitude(longitude),
            region,
        })
    }

    pub fn orbital_position(&self) -> String {
        format_orbital_position(self.longitude)
    }
}

/// Parses an orbital position such as `13E`, `19.2°E`, `30 W`, `-30` or the
/// East-positive `330`, returning a longitude in (-180, 180].
pub fn parse_orbital_position(input: &str) -> Result<f64, RegistryError> {
    let invalid = || RegistryError::InvalidPosition(input.to_string());
    let trimmed = input.trim();

    let (number, hemisphere_sign) = match trimmed.chars().last() {
        Some('E') | Some('e') => (&trimmed[..trimmed.len() - 1], Some(1.0)),
        Some('W') | Some('w') => (&trimmed[..trimmed.len() - 1], Some(-1.0)),
        _ => (trimmed, None),
    };
    let number = number.trim_end().trim_end_matches('°').trim();
    let value: f64 = number.parse().map_err(|_| invalid())?;

    match hemisphere_sign {
        Some(sign) if (0.0..=180.0).contains(&value) => Ok(normalize_longitude(sign * value)),
        None if (-180.0..360.0).contains(&value) => Ok(normalize_longitude(value)),
        _ => Err(invalid()),
    }
}

pub fn format_orbital_position(longitude: f64) -> String {
    let longitude = normalize_longitude(longitude);
    if longitude < 0.0 {
        format!("{:.1}°W", longitude.abs())
    } else {
        format!("{:.1}°E", longitude)
    }
}

// Case, spaces and punctuation are ignored when matching names.
fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Static dataset of geostationary satellites, extendable from config.
#[derive(Debug, Clone)]
pub struct SatelliteRegistry {
    satellites: Vec<GeoSatellite>,
}

impl SatelliteRegistry {
    pub fn builtin() -> Self {
        let satellites = BUILTIN_SATELLITES
            .iter()
            .map(|(name, longitude, region)| GeoSatellite {
                name: name.to_string(),
                longitude: *longitude,
                region: region.to_string(),
            })
            .collect();
        Self { satellites }
    }

    /// Adds custom entries; an entry whose name matches an existing one
    /// replaces it.
    pub fn with_custom(mut self, custom: Vec<GeoSatellite>) -> Self {
        for satellite in custom {
            let key = name_key(&satellite.name);
            match self.satellites.iter_mut().find(|s| name_key(&s.name) == key) {
                Some(existing) => {
                    log::debug!("Overriding registry entry {}", existing.name);
                    *existing = satellite;
                }
                None => self.satellites.push(satellite),
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoSatellite> {
        self.satellites.iter()
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    /// Exact name match first, then the first entry containing the query.
    pub fn find(&self, query: &str) -> Option<&GeoSatellite> {
        let key = name_key(query);
        if key.is_empty() {
            return None;
        }
        self.satellites
            .iter()
            .find(|s| name_key(&s.name) == key)
            .or_else(|| self.satellites.iter().find(|s| name_key(&s.name).contains(&key)))
    }

    pub fn at_longitude(&self, longitude: f64) -> Option<&GeoSatellite> {
        let longitude = normalize_longitude(longitude);
        self.satellites
            .iter()
            .find(|s| (s.longitude - longitude).abs() < SLOT_TOLERANCE_DEG)
    }

    /// Resolves either an orbital position or a satellite name. A position
    /// with no registry entry becomes an unnamed slot on the arc.
    pub fn resolve(&self, query: &str) -> Result<GeoSatellite, RegistryError> {
        if let Ok(longitude) = parse_orbital_position(query) {
            return Ok(self.at_longitude(longitude).cloned().unwrap_or_else(|| GeoSatellite {
                name: format!("Slot {}", format_orbital_position(longitude)),
                longitude,
                region: "Custom".to_string(),
            }));
        }
        self.find(query)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownSatellite(query.to_string()))
    }

    pub fn by_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a GeoSatellite> {
        self.satellites
            .iter()
            .filter(move |s| s.region.eq_ignore_ascii_case(region))
    }

    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = Vec::new();
        for satellite in &self.satellites {
            if !regions.contains(&satellite.region.as_str()) {
                regions.push(&satellite.region);
            }
        }
        regions
    }

    /// Pointing solutions for every satellite, highest elevation first.
    pub fn rank_for(
        &self,
        coordinate: &GeoCoordinate,
    ) -> Result<Vec<(&GeoSatellite, PointingSolution)>, GeometryError> {
        let mut ranked = self
            .satellites
            .iter()
            .map(|satellite| {
                calculate_all(coordinate.latitude(), coordinate.longitude(), satellite.longitude)
                    .map(|solution| (satellite, solution))
            })
            .collect::<Result<Vec<_>, _>>()?;

        ranked.sort_by(|a, b| b.1.elevation_deg.total_cmp(&a.1.elevation_deg));
        Ok(ranked)
    }

    pub fn visible_from(
        &self,
        coordinate: &GeoCoordinate,
    ) -> Result<Vec<(&GeoSatellite, PointingSolution)>, GeometryError> {
        Ok(self
            .rank_for(coordinate)?
            .into_iter()
            .filter(|(_, solution)| solution.is_visible)
            .collect())
    }
}

impl Default for SatelliteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
