use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("latitude {0} is outside [-90, 90] degrees")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180] degrees")]
    LongitudeOutOfRange(f64),
    #[error("satellite longitude {0} is outside [-180, 360) degrees")]
    SatelliteLongitudeOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("unknown satellite or orbital position: {0}")]
    UnknownSatellite(String),
    #[error("invalid orbital position '{0}'")]
    InvalidPosition(String),
    #[error("invalid satellite entry: {0}")]
    Geometry(#[from] GeometryError),
}
