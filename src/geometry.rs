//! Dish pointing geometry for geostationary satellites.
//!
//! Closed-form spherical formulas over an idealized circular geostationary
//! orbit. Every function here is pure: same input, same bits out.

use serde::Serialize;

use crate::error::GeometryError;
use crate::quality::SignalQuality;

/// Equatorial Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6378.137;
/// Height of the geostationary arc above the equator (km).
pub const GEO_ALTITUDE_KM: f64 = 35786.0;
/// Distance from Earth's centre to the geostationary arc (km).
pub const GEO_RADIUS_KM: f64 = EARTH_RADIUS_KM + GEO_ALTITUDE_KM;

/// Observer position in degrees, range-checked on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeometryError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn pointing_to(
        &self,
        satellite_longitude: f64,
    ) -> Result<PointingSolution, GeometryError> {
        calculate_all(self.latitude, self.longitude, satellite_longitude)
    }
}

/// Everything needed to aim a dish, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointingSolution {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub lnb_tilt_deg: f64,
    pub distance_km: f64,
    pub is_visible: bool,
    pub signal_quality: SignalQuality,
}

/// Wraps any angle into [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let wrapped = value.rem_euclid(360.0);
    // rem_euclid of a tiny negative value can land on 360.0; -0.0 collapses too
    if wrapped >= 360.0 || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Maps a longitude in either the [-180, 180] or the East-positive [0, 360)
/// convention onto (-180, 180].
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > -180.0 && longitude <= 180.0 {
        return longitude;
    }
    let wrapped = normalize_degrees(longitude);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Rounds half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // no negative zero in reported angles
    rounded + 0.0
}

fn delta_lon_rad(obs_lon: f64, sat_lon: f64) -> f64 {
    (sat_lon - obs_lon).to_radians()
}

fn cos_gamma(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    obs_lat.to_radians().cos() * delta_lon_rad(obs_lon, sat_lon).cos()
}

/// Compass bearing (clockwise from true North) from the observer to the
/// satellite, in [0, 360).
///
/// The equator counts as northern hemisphere. There `sin φ` is zero and the
/// two-argument arctangent resolves to due East or due West, or to due South
/// when the observer sits on the sub-satellite point.
pub fn compute_azimuth(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    let phi = obs_lat.to_radians();
    let raw = delta_lon_rad(obs_lon, sat_lon)
        .tan()
        .atan2(phi.sin().abs())
        .to_degrees();

    if obs_lat < 0.0 {
        normalize_degrees(raw)
    } else {
        normalize_degrees(180.0 - raw)
    }
}

/// Angle of the satellite above the local horizon.
///
/// At the sub-satellite point the radicand vanishes and the result is the
/// limiting +90°; at the exact antipode it is -90°, which `calculate_all`
/// reports as -89.9.
pub fn compute_elevation(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    let cos_gamma = cos_gamma(obs_lat, obs_lon, sat_lon);
    let ratio = GEO_RADIUS_KM / EARTH_RADIUS_KM;
    let radicand = (1.0 - cos_gamma * cos_gamma).max(0.0);

    (cos_gamma - 1.0 / ratio).atan2(radicand.sqrt()).to_degrees()
}

/// Polarization skew of the LNB. Positive is clockwise when facing the dish
/// from behind. On the equator the skew is taken as 0.
pub fn compute_lnb_tilt(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    // subnormal latitudes vanish in to_radians(), so test the divisor itself
    let tan_phi = obs_lat.to_radians().tan();
    if tan_phi == 0.0 {
        return 0.0;
    }
    (delta_lon_rad(obs_lon, sat_lon).sin() / tan_phi)
        .atan()
        .to_degrees()
}

/// Skew repeats every 180°, so a rounded -90.0 is reported as +90.0.
fn report_tilt(tilt_deg: f64) -> f64 {
    let rounded = round_to_tenth(tilt_deg);
    if rounded <= -90.0 {
        90.0
    } else {
        rounded
    }
}

/// Reported elevations stay in (-90, 90]. The nadir case (the exact antipode
/// and anything rounding onto it) is reported as -89.9.
fn report_elevation(elevation_deg: f64) -> f64 {
    round_to_tenth(elevation_deg).max(-89.9)
}

/// Slant range to the satellite in whole kilometres.
pub fn compute_distance(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    let cos_gamma = cos_gamma(obs_lat, obs_lon, sat_lon);
    let squared = EARTH_RADIUS_KM * EARTH_RADIUS_KM + GEO_RADIUS_KM * GEO_RADIUS_KM
        - 2.0 * EARTH_RADIUS_KM * GEO_RADIUS_KM * cos_gamma;
    squared.max(0.0).sqrt().round()
}

/// Great-circle angle between the observer and the sub-satellite point.
pub fn angular_separation_deg(obs_lat: f64, obs_lon: f64, sat_lon: f64) -> f64 {
    cos_gamma(obs_lat, obs_lon, sat_lon)
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

/// Separation at which a geostationary satellite sits on the geometric
/// horizon (about 81.3°).
pub fn horizon_separation_deg() -> f64 {
    (EARTH_RADIUS_KM / GEO_RADIUS_KM).acos().to_degrees()
}

/// Full pointing solution for one observer/satellite pair.
///
/// Inputs are validated first; the satellite longitude may use either the
/// [-180, 180] or the [0, 360) East-positive convention.
pub fn calculate_all(
    obs_lat: f64,
    obs_lon: f64,
    sat_lon: f64,
) -> Result<PointingSolution, GeometryError> {
    GeoCoordinate::new(obs_lat, obs_lon)?;
    if !(-180.0..360.0).contains(&sat_lon) {
        return Err(GeometryError::SatelliteLongitudeOutOfRange(sat_lon));
    }

    // re-wrap: 359.96 rounds up to 360.0
    let azimuth_deg =
        normalize_degrees(round_to_tenth(compute_azimuth(obs_lat, obs_lon, sat_lon)));
    let elevation_deg = report_elevation(compute_elevation(obs_lat, obs_lon, sat_lon));
    let lnb_tilt_deg = report_tilt(compute_lnb_tilt(obs_lat, obs_lon, sat_lon));
    let distance_km = compute_distance(obs_lat, obs_lon, sat_lon);

    Ok(PointingSolution {
        azimuth_deg,
        elevation_deg,
        lnb_tilt_deg,
        distance_km,
        is_visible: elevation_deg > 0.0,
        signal_quality: SignalQuality::classify(elevation_deg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_dubai_to_hotbird() {
        let solution = calculate_all(25.0, 55.0, 13.0).unwrap();

        assert_eq!(solution.azimuth_deg, 244.9);
        assert_eq!(solution.elevation_deg, 35.2);
        assert_eq!(solution.lnb_tilt_deg, -55.1);
        assert_eq!(solution.distance_km, 38161.0);
        assert!(solution.is_visible);
        assert_eq!(solution.signal_quality, SignalQuality::Excellent);
    }

    #[test]
    fn test_london_to_astra_28_2e() {
        let solution = calculate_all(51.5, -0.13, 28.2).unwrap();

        assert_eq!(solution.azimuth_deg, 145.4);
        assert_eq!(solution.elevation_deg, 25.4);
        assert_eq!(solution.lnb_tilt_deg, 20.7);
        assert_eq!(solution.distance_km, 39036.0);
        assert_eq!(solution.signal_quality, SignalQuality::Good);
    }

    #[test]
    fn test_southern_hemisphere_points_north() {
        // Sydney to Optus at 156°E
        let solution = calculate_all(-33.87, 151.21, 156.0).unwrap();

        assert_eq!(solution.azimuth_deg, 8.6);
        assert_eq!(solution.elevation_deg, 50.3);
        assert_eq!(solution.lnb_tilt_deg, -7.1);
        assert_eq!(solution.distance_km, 37060.0);

        // Cape Town to a satellite at 30°W sits north-west
        let solution = calculate_all(-33.9, 18.4, -30.0).unwrap();
        assert_eq!(solution.azimuth_deg, 296.3);
        assert_eq!(solution.elevation_deg, 25.6);
        assert_eq!(solution.lnb_tilt_deg, 48.1);
    }

    #[test]
    fn test_western_hemisphere_observer() {
        let solution = calculate_all(40.71, -74.0, -101.0).unwrap();

        assert_eq!(solution.azimuth_deg, 218.0);
        assert_eq!(solution.elevation_deg, 35.4);
        assert_eq!(solution.lnb_tilt_deg, -27.8);
    }

    #[test]
    fn test_sub_satellite_point() {
        assert_eq!(compute_elevation(0.0, 0.0, 0.0), 90.0);
        assert_eq!(compute_distance(0.0, 0.0, 0.0), GEO_ALTITUDE_KM);

        let azimuth = compute_azimuth(0.0, 0.0, 0.0);
        let tilt = compute_lnb_tilt(0.0, 0.0, 0.0);
        assert!(azimuth.is_finite());
        assert!(tilt.is_finite());

        let solution = calculate_all(0.0, 0.0, 0.0).unwrap();
        assert_eq!(solution.elevation_deg, 90.0);
        assert_eq!(solution.distance_km, 35786.0);
        assert_eq!(solution.azimuth_deg, 180.0);
        assert_eq!(solution.lnb_tilt_deg, 0.0);
        assert_eq!(solution.signal_quality, SignalQuality::Excellent);
    }

    #[test]
    fn test_antipode_is_finite() {
        assert_eq!(compute_elevation(0.0, 0.0, 180.0), -90.0);

        let solution = calculate_all(0.0, 0.0, 180.0).unwrap();
        assert_eq!(solution.elevation_deg, -89.9);
        assert!(solution.azimuth_deg.is_finite());
        assert!(!solution.is_visible);
        assert_eq!(solution.signal_quality, SignalQuality::NoSignal);

        // Raw -89.991° also rounds onto the nadir
        let near = calculate_all(0.0, 0.01, 180.0).unwrap();
        assert_eq!(near.elevation_deg, -89.9);
    }

    #[test]
    fn test_tilt_near_equator_reports_plus_90() {
        // Raw skew is -89.99°, the same feed rotation as +90°
        assert_close(compute_lnb_tilt(0.01, 90.0, 0.0), -89.99, 1e-3);
        let solution = calculate_all(0.01, 90.0, 0.0).unwrap();
        assert_eq!(solution.lnb_tilt_deg, 90.0);

        let south = calculate_all(-0.01, -90.0, 0.0).unwrap();
        assert_eq!(south.lnb_tilt_deg, 90.0);

        // +89.99° is already in range and rounds to 90.0 as usual
        let east = calculate_all(0.01, -90.0, 0.0).unwrap();
        assert_eq!(east.lnb_tilt_deg, 90.0);
    }

    #[test]
    fn test_subnormal_latitude_tilt_is_finite() {
        assert_eq!(5e-324_f64.to_radians(), 0.0);
        assert_eq!(compute_lnb_tilt(5e-324, 10.0, 10.0), 0.0);
        assert_eq!(compute_lnb_tilt(-5e-324, 10.0, 10.0), 0.0);

        let solution = calculate_all(5e-324, 10.0, 10.0).unwrap();
        assert_eq!(solution.lnb_tilt_deg, 0.0);
        assert_eq!(solution.elevation_deg, 90.0);
        assert_eq!(solution.azimuth_deg, 180.0);
    }

    #[test]
    fn test_equator_azimuth_uses_signed_arctangent() {
        // Satellite due West of the observer
        assert_close(compute_azimuth(0.0, 10.0, 0.0), 270.0, 1e-9);
        // Satellite due East of the observer
        assert_close(compute_azimuth(0.0, -10.0, 0.0), 90.0, 1e-9);
        assert_eq!(compute_lnb_tilt(0.0, 10.0, 0.0), 0.0);
        assert_eq!(compute_lnb_tilt(0.0, -10.0, 0.0), 0.0);
    }

    #[test]
    fn test_same_meridian_points_due_south_in_north() {
        assert_close(compute_azimuth(60.0, 0.0, 0.0), 180.0, 1e-9);
        assert_close(compute_lnb_tilt(60.0, 0.0, 0.0), 0.0, 1e-9);
        let solution = calculate_all(60.0, 0.0, 0.0).unwrap();
        assert_eq!(solution.elevation_deg, 21.9);
    }

    #[test]
    fn test_azimuth_in_range_for_all_inputs() {
        for lat in (-90..=90).step_by(5) {
            for lon in (-180..=180).step_by(10) {
                for sat in (-180..180).step_by(15) {
                    let (lat, lon, sat) = (lat as f64, lon as f64, sat as f64);
                    let azimuth = compute_azimuth(lat, lon, sat);
                    assert!(
                        (0.0..360.0).contains(&azimuth),
                        "azimuth {} for {}/{}/{}",
                        azimuth,
                        lat,
                        lon,
                        sat
                    );

                    let solution = calculate_all(lat, lon, sat).unwrap();
                    assert!((0.0..360.0).contains(&solution.azimuth_deg));
                    assert!(solution.elevation_deg > -90.0 && solution.elevation_deg <= 90.0);
                    assert!(solution.lnb_tilt_deg > -90.0 && solution.lnb_tilt_deg <= 90.0);
                    assert_eq!(solution.is_visible, solution.elevation_deg > 0.0);
                    if !solution.is_visible {
                        assert_eq!(solution.signal_quality, SignalQuality::NoSignal);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rounding_never_reports_360() {
        // Raw azimuth is 359.994..., which rounds up to 360.0
        assert!(compute_azimuth(-10.0, 0.001, 0.0) > 359.95);
        let solution = calculate_all(-10.0, 0.001, 0.0).unwrap();
        assert_eq!(solution.azimuth_deg, 0.0);
    }

    #[test]
    fn test_calculate_all_is_idempotent() {
        let first = calculate_all(35.68, 139.69, 110.0).unwrap();
        let second = calculate_all(35.68, 139.69, 110.0).unwrap();

        assert_eq!(first.azimuth_deg.to_bits(), second.azimuth_deg.to_bits());
        assert_eq!(first.elevation_deg.to_bits(), second.elevation_deg.to_bits());
        assert_eq!(first.lnb_tilt_deg.to_bits(), second.lnb_tilt_deg.to_bits());
        assert_eq!(first.distance_km.to_bits(), second.distance_km.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_elevation_decreases_with_separation() {
        let mut previous = compute_elevation(0.0, 0.0, 0.0);
        for step in 1..=160 {
            let lat = step as f64 * 0.5;
            let elevation = compute_elevation(lat, 0.0, 0.0);
            assert!(elevation < previous, "not decreasing at {}", lat);
            previous = elevation;
        }

        let horizon = horizon_separation_deg();
        assert_close(horizon, 81.2995, 1e-3);
        assert_close(compute_elevation(horizon, 0.0, 0.0), 0.0, 1e-9);
        assert_close(angular_separation_deg(horizon, 0.0, 0.0), horizon, 1e-9);
    }

    #[test]
    fn test_visibility_follows_rounded_elevation() {
        // Raw elevation is about -0.0005°, which rounds to 0.0
        let solution = calculate_all(81.3, 0.0, 0.0).unwrap();
        assert_eq!(solution.elevation_deg, 0.0);
        assert!(solution.elevation_deg.is_sign_positive());
        assert!(!solution.is_visible);
        assert_eq!(solution.signal_quality, SignalQuality::NoSignal);

        // Raw elevation is about 0.0995°, which rounds to 0.1
        let solution = calculate_all(81.2, 0.0, 0.0).unwrap();
        assert_eq!(solution.elevation_deg, 0.1);
        assert!(solution.is_visible);
        assert_eq!(solution.signal_quality, SignalQuality::Poor);
    }

    #[test]
    fn test_accepts_east_positive_satellite_longitude() {
        let west = calculate_all(51.5, -0.13, -30.0).unwrap();
        let east_positive = calculate_all(51.5, -0.13, 330.0).unwrap();
        assert_eq!(west.azimuth_deg, east_positive.azimuth_deg);
        assert_eq!(west.elevation_deg, east_positive.elevation_deg);
        assert_eq!(west.distance_km, east_positive.distance_km);
    }

    #[test]
    fn test_rejects_out_of_range_input() {
        assert_eq!(
            calculate_all(90.5, 0.0, 0.0),
            Err(GeometryError::LatitudeOutOfRange(90.5))
        );
        assert_eq!(
            calculate_all(0.0, -180.5, 0.0),
            Err(GeometryError::LongitudeOutOfRange(-180.5))
        );
        assert_eq!(
            calculate_all(0.0, 0.0, 360.0),
            Err(GeometryError::SatelliteLongitudeOutOfRange(360.0))
        );
        assert!(calculate_all(f64::NAN, 0.0, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalization_helpers() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-1e-17), 0.0);
        assert_eq!(normalize_longitude(330.0), -30.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(round_to_tenth(0.05), 0.1);
        assert_eq!(round_to_tenth(-0.05), -0.1);
        assert_eq!(round_to_tenth(-0.04), 0.0);
        assert!(round_to_tenth(-0.04).is_sign_positive());
    }
}
