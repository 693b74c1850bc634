//! Pointing geometry for aiming a satellite dish at a geostationary satellite.
//!
//! [`geometry`] is the pure calculation engine; the remaining modules are the
//! location, registry and presentation glue around it.

pub mod config;
pub mod database;
pub mod error;
pub mod geometry;
pub mod guidance;
pub mod observer;
pub mod quality;
pub mod satellite;

pub use error::{GeometryError, RegistryError};
pub use geometry::{
    calculate_all, compute_azimuth, compute_distance, compute_elevation, compute_lnb_tilt,
    GeoCoordinate, PointingSolution,
};
pub use observer::Observer;
pub use quality::{classify_signal_quality, SignalQuality};
pub use satellite::{GeoSatellite, SatelliteRegistry};
