//! Concentration curves
//!
//! Each gas species follows a straight line on the datasheet's log-log
//! sensitivity chart:
//!
//! ```text
//! log10(ppm) = (log10(Rs/Ro) - log_ratio_ref) / slope + log_ppm_ref
//! ```
//!
//! The three parameters are read off the chart at a reference point. Only
//! the (log-ppm-ref, log-ratio-ref, slope) convention is used here; curve
//! tables written for other conventions must be converted first.

use crate::constants::gas::{CO_CURVE, LPG_CURVE, MIN_CURVE_SLOPE, SMOKE_CURVE};
use crate::errors::PpmError;

/// Gas species reported by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum GasChannel {
    /// Liquefied petroleum gas
    Lpg = 0,
    /// Carbon monoxide
    Co = 1,
    /// Smoke
    Smoke = 2,
}

impl GasChannel {
    /// Every channel, in storage order
    pub const ALL: [GasChannel; 3] = [GasChannel::Lpg, GasChannel::Co, GasChannel::Smoke];

    /// Position in per-channel arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            GasChannel::Lpg => "lpg",
            GasChannel::Co => "co",
            GasChannel::Smoke => "smoke",
        }
    }
}

/// Three-parameter log-log curve for one species
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasCurve {
    /// log10 of the reference concentration
    pub log_ppm_ref: f32,
    /// log10 of Rs/Ro at the reference concentration
    pub log_ratio_ref: f32,
    /// Slope of the line (negative for reducing gases)
    pub slope: f32,
}

impl GasCurve {
    /// Curve through (log_ratio_ref, log_ppm_ref) with the given slope
    pub const fn new(log_ppm_ref: f32, log_ratio_ref: f32, slope: f32) -> Self {
        Self { log_ppm_ref, log_ratio_ref, slope }
    }

    const fn from_triple(triple: (f32, f32, f32)) -> Self {
        Self::new(triple.0, triple.1, triple.2)
    }

    /// Datasheet curve for a channel
    pub const fn datasheet(channel: GasChannel) -> Self {
        match channel {
            GasChannel::Lpg => Self::from_triple(LPG_CURVE),
            GasChannel::Co => Self::from_triple(CO_CURVE),
            GasChannel::Smoke => Self::from_triple(SMOKE_CURVE),
        }
    }
}

/// Per-channel curve table; a `None` entry means the channel is not
/// characterized
pub type CurveTable = [Option<GasCurve>; 3];

/// Datasheet curves for all channels
pub const DATASHEET_CURVES: CurveTable = [
    Some(GasCurve::datasheet(GasChannel::Lpg)),
    Some(GasCurve::datasheet(GasChannel::Co)),
    Some(GasCurve::datasheet(GasChannel::Smoke)),
];

/// Concentration in ppm for an Rs/Ro ratio
///
/// Checks run in a fixed order: missing curve, degenerate slope,
/// non-positive ratio, then a non-finite result.
pub fn ppm(ratio: f32, curve: Option<&GasCurve>) -> Result<f32, PpmError> {
    let curve = curve.ok_or(PpmError::MissingCurve)?;

    if libm::fabsf(curve.slope) < MIN_CURVE_SLOPE {
        return Err(PpmError::DegenerateSlope { slope: curve.slope });
    }

    if ratio <= 0.0 {
        return Err(PpmError::NonPositiveRatio { ratio });
    }

    let log_ppm = (libm::log10f(ratio) - curve.log_ratio_ref) / curve.slope + curve.log_ppm_ref;
    let value = libm::powf(10.0, log_ppm);

    if !value.is_finite() {
        return Err(PpmError::NumericOverflow { ratio });
    }

    Ok(value)
}
