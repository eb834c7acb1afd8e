//! Gas concentration estimation for MQ-2 class resistive sensors
//!
//! The pipeline is raw ADC reading -> sensor resistance Rs -> ratio Rs/Ro
//! against the clean-air baseline Ro -> ppm through a per-species log-log
//! curve.
//!
//! ```text
//! Sampler ──► GasResistanceModel ──► averaging ──┬─► GasCalibrationEngine ──► Ro
//!                                                └─► GasConcentrationEngine ──► ppm[3]
//! ```

pub mod calibration;
pub mod concentration;
pub mod curve;
pub mod resistance;
mod sampling;

pub use calibration::{CalibrationState, GasCalibrationEngine};
pub use concentration::{GasConcentrationEngine, GasConcentrations};
pub use curve::{ppm, CurveTable, GasChannel, GasCurve, DATASHEET_CURVES};
pub use resistance::GasResistanceModel;

use crate::constants::gas::{
    ADC_MAX_12BIT, CACHE_FRESHNESS_MS, CALIBRATION_SAMPLE_COUNT, CALIBRATION_SAMPLE_INTERVAL_MS,
    CLEAN_AIR_RATIO, DEFAULT_LOAD_RESISTANCE_KOHM, MAX_POLLS_PER_SAMPLE, READ_SAMPLE_COUNT,
    READ_SAMPLE_INTERVAL_MS,
};
use crate::traits::RawSample;

/// Static gas sensor configuration
///
/// Read-only after startup. Defaults match the MQ-2 board the node ships
/// with.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GasSensorConfig {
    /// Load resistor RL (kΩ)
    pub load_resistance_kohm: f32,
    /// Full-scale raw reading
    pub adc_max: RawSample,
    /// Rs/Ro in clean air
    pub clean_air_ratio: f32,
    /// Samples averaged by a calibration
    pub calibration_samples: u16,
    /// Spacing between calibration samples (ms)
    pub calibration_interval_ms: u32,
    /// Samples averaged by a routine read
    pub read_samples: u16,
    /// Spacing between read samples (ms)
    pub read_interval_ms: u32,
    /// Polls of a pending conversion before the sample is given up
    pub max_polls_per_sample: u32,
    /// How long a cached channel value stays valid
    pub cache_freshness_ms: u64,
    /// Curves indexed by `GasChannel::index`
    pub curves: CurveTable,
}

impl Default for GasSensorConfig {
    fn default() -> Self {
        Self {
            load_resistance_kohm: DEFAULT_LOAD_RESISTANCE_KOHM,
            adc_max: ADC_MAX_12BIT,
            clean_air_ratio: CLEAN_AIR_RATIO,
            calibration_samples: CALIBRATION_SAMPLE_COUNT,
            calibration_interval_ms: CALIBRATION_SAMPLE_INTERVAL_MS,
            read_samples: READ_SAMPLE_COUNT,
            read_interval_ms: READ_SAMPLE_INTERVAL_MS,
            max_polls_per_sample: MAX_POLLS_PER_SAMPLE,
            cache_freshness_ms: CACHE_FRESHNESS_MS,
            curves: DATASHEET_CURVES,
        }
    }
}

impl GasSensorConfig {
    /// Resistance model for these constants
    pub fn model(&self) -> GasResistanceModel {
        GasResistanceModel::new(self.load_resistance_kohm, self.adc_max)
    }
}
