use serde::Serialize;

use crate::error::GeometryError;
use crate::geometry::{GeoCoordinate, PointingSolution};

/// A named observing position, e.g. "Home" or a saved rooftop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observer {
    pub name: String,
    pub coordinate: GeoCoordinate,
}

impl Observer {
    pub fn new(name: String, lat: f64, lon: f64) -> Result<Self, GeometryError> {
        Ok(Self {
            name,
            coordinate: GeoCoordinate::new(lat, lon)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    pub fn point_at(&self, satellite_longitude: f64) -> Result<PointingSolution, GeometryError> {
        self.coordinate.pointing_to(satellite_longitude)
    }

    // e.g. "25.0000°N, 55.0000°E"
    pub fn format_position(&self) -> String {
        let lat = self.latitude();
        let lon = self.longitude();
        format!(
            "{:.4}°{}, {:.4}°{}",
            lat.abs(),
            if lat < 0.0 { 'S' } else { 'N' },
            lon.abs(),
            if lon < 0.0 { 'W' } else { 'E' }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_coordinates() {
        assert!(Observer::new("Dubai".to_string(), 25.0, 55.0).is_ok());
        assert_eq!(
            Observer::new("Nowhere".to_string(), -91.0, 0.0),
            Err(GeometryError::LatitudeOutOfRange(-91.0))
        );
        assert_eq!(
            Observer::new("Nowhere".to_string(), 0.0, 200.0),
            Err(GeometryError::LongitudeOutOfRange(200.0))
        );
    }

    #[test]
    fn test_point_at_matches_engine() {
        let observer = Observer::new("Dubai".to_string(), 25.0, 55.0).unwrap();
        let solution = observer.point_at(13.0).unwrap();
        assert_eq!(solution.azimuth_deg, 244.9);
        assert_eq!(solution.elevation_deg, 35.2);
    }

    #[test]
    fn test_format_position() {
        let observer = Observer::new("Sydney".to_string(), -33.87, 151.21).unwrap();
        assert_eq!(observer.format_position(), "33.8700°S, 151.2100°E");

        let observer = Observer::new("New York".to_string(), 40.71, -74.0).unwrap();
        assert_eq!(observer.format_position(), "40.7100°N, 74.0000°W");
    }
}
