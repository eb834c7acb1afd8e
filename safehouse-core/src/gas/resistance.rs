//! Raw reading to sensor resistance
//!
//! The sensor forms a divider with the load resistor RL. With the ADC
//! reading the voltage across RL:
//!
//! ```text
//! Rs = RL * (ADC_MAX - raw) / raw
//! ```
//!
//! A reading at full scale is a saturated divider, i.e. Rs close to zero.
//! That is valid data (heavy contamination), not a fault. A reading at or
//! below zero has no physical interpretation and is rejected.

use crate::constants::gas::{ADC_MAX_12BIT, DEFAULT_LOAD_RESISTANCE_KOHM};
use crate::errors::AcquisitionError;
use crate::traits::RawSample;

/// Pure raw-to-resistance model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasResistanceModel {
    /// Load resistor (kΩ)
    pub load_resistance: f32,
    /// Full-scale raw reading
    pub adc_max: RawSample,
}

impl Default for GasResistanceModel {
    fn default() -> Self {
        Self {
            load_resistance: DEFAULT_LOAD_RESISTANCE_KOHM,
            adc_max: ADC_MAX_12BIT,
        }
    }
}

impl GasResistanceModel {
    /// Model for load resistor RL (kΩ) and full-scale reading `adc_max`
    pub const fn new(load_resistance: f32, adc_max: RawSample) -> Self {
        Self { load_resistance, adc_max }
    }

    /// Sensor resistance in kΩ for one raw reading
    ///
    /// Readings above full scale are clamped to full scale and yield 0.0.
    pub fn resistance(&self, raw: RawSample) -> Result<f32, AcquisitionError> {
        if raw <= 0 {
            return Err(AcquisitionError::NonPhysicalRaw { raw });
        }

        let raw = raw.min(self.adc_max);
        let headroom = (self.adc_max - raw) as f32;
        Ok(self.load_resistance * headroom / raw as f32)
    }
}
