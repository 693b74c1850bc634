//! Turning a pointing solution into "which way do I rotate the dish" hints
//! against a live compass heading.

use serde::Serialize;

use crate::geometry::normalize_degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
    OnTarget,
}

impl TurnDirection {
    pub fn as_str(&self) -> &str {
        match self {
            TurnDirection::Left => "Turn left",
            TurnDirection::Right => "Turn right",
            TurnDirection::OnTarget => "On target",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Guidance {
    pub target_azimuth_deg: f64,
    pub heading_deg: f64,
    /// Signed shortest rotation, positive clockwise.
    pub delta_deg: f64,
    pub direction: TurnDirection,
}

/// Shortest signed rotation from `heading_deg` to `target_deg`, in
/// (-180, 180]. Positive means turn clockwise (right).
pub fn heading_delta(target_deg: f64, heading_deg: f64) -> f64 {
    let delta = normalize_degrees(target_deg - heading_deg);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

pub fn guide(target_azimuth_deg: f64, heading_deg: f64, tolerance_deg: f64) -> Guidance {
    let heading_deg = normalize_degrees(heading_deg);
    let delta_deg = heading_delta(target_azimuth_deg, heading_deg);
    let direction = if delta_deg.abs() <= tolerance_deg {
        TurnDirection::OnTarget
    } else if delta_deg > 0.0 {
        TurnDirection::Right
    } else {
        TurnDirection::Left
    };

    Guidance {
        target_azimuth_deg,
        heading_deg,
        delta_deg,
        direction,
    }
}

pub fn azimuth_to_cardinal(azimuth: f64) -> &'static str {
    let az = normalize_degrees(azimuth);
    match az {
        a if !(22.5..337.5).contains(&a) => "N",
        a if a < 67.5 => "NE",
        a if a < 112.5 => "E",
        a if a < 157.5 => "SE",
        a if a < 202.5 => "S",
        a if a < 247.5 => "SW",
        a if a < 292.5 => "W",
        _ => "NW",
    }
}
