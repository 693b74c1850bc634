use serde::Serialize;

const EXCELLENT_ABOVE_DEG: f64 = 30.0;
const GOOD_ABOVE_DEG: f64 = 20.0;
const FAIR_ABOVE_DEG: f64 = 10.0;
const POOR_ABOVE_DEG: f64 = 0.0;

/// Coarse reception estimate derived from the dish elevation.
///
/// Variants are ordered from worst to best, so `a < b` means `b` is the
/// better signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalQuality {
    #[serde(rename = "none")]
    NoSignal,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SignalQuality {
    /// Each band excludes its lower bound: exactly 30.0° is `Good`.
    pub fn classify(elevation_deg: f64) -> Self {
        if elevation_deg > EXCELLENT_ABOVE_DEG {
            SignalQuality::Excellent
        } else if elevation_deg > GOOD_ABOVE_DEG {
            SignalQuality::Good
        } else if elevation_deg > FAIR_ABOVE_DEG {
            SignalQuality::Fair
        } else if elevation_deg > POOR_ABOVE_DEG {
            SignalQuality::Poor
        } else {
            SignalQuality::NoSignal
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignalQuality::Excellent => "Excellent",
            SignalQuality::Good => "Good",
            SignalQuality::Fair => "Fair",
            SignalQuality::Poor => "Poor",
            SignalQuality::NoSignal => "No Signal",
        }
    }
}

/// Free-function form of [`SignalQuality::classify`].
pub fn classify_signal_quality(elevation_deg: f64) -> SignalQuality {
    SignalQuality::classify(elevation_deg)
}
