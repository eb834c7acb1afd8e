//! Resistive Gas Sensor Specifications
//!
//! Electrical and calibration constants for MQ-2 class tin-dioxide sensors
//! read through a 12-bit ADC behind a load resistor divider.

// ===== ADC FRONT END =====

/// Full-scale raw reading for a 12-bit ADC.
///
/// Readings at or above this value mean the divider output is saturated;
/// the resistance model treats saturation as a near-zero resistance,
/// not as a fault.
pub const ADC_MAX_12BIT: i32 = 4095;

/// Load resistor on the sensor breakout (kΩ).
///
/// Most MQ-2 modules ship with a 5 kΩ load. Check the module schematic;
/// some carry 10 kΩ or 1 kΩ.
///
/// Source: common FC-22 / Flying-Fish MQ-2 module schematics
pub const DEFAULT_LOAD_RESISTANCE_KOHM: f32 = 5.0;

/// Rs/Ro ratio in clean air.
///
/// The datasheet sensitivity chart puts clean air at roughly 9.83.
///
/// Source: Hanwei MQ-2 datasheet, sensitivity characteristics
pub const CLEAN_AIR_RATIO: f32 = 9.83;

// ===== SAMPLING DISCIPLINE =====

/// Samples averaged during clean-air calibration.
pub const CALIBRATION_SAMPLE_COUNT: u16 = 50;

/// Spacing between calibration samples (ms).
///
/// 50 × 500 ms gives a 25 s calibration window, long enough to average
/// out heater ripple.
pub const CALIBRATION_SAMPLE_INTERVAL_MS: u32 = 500;

/// Samples averaged for a routine resistance read.
pub const READ_SAMPLE_COUNT: u16 = 5;

/// Spacing between routine read samples (ms).
pub const READ_SAMPLE_INTERVAL_MS: u32 = 50;

/// Polls of a pending conversion before the sample counts as timed out.
///
/// Bounds every sampling window even if the ADC never finishes a
/// conversion.
pub const MAX_POLLS_PER_SAMPLE: u32 = 10_000;

/// Freshness window of a cached per-channel concentration (ms).
///
/// A single-channel read inside this window reuses the cached value instead
/// of sampling again.
pub const CACHE_FRESHNESS_MS: u64 = 100;

// ===== CONCENTRATION CURVES =====
//
// Each curve is (log10(ppm_ref), log10(Rs/Ro at ppm_ref), slope) read off the
// log-log sensitivity chart. The slope is negative: resistance falls as the
// concentration rises.

/// LPG curve: through (200 ppm, 1.62) with slope -0.47.
pub const LPG_CURVE: (f32, f32, f32) = (2.3, 0.21, -0.47);

/// CO curve: through (200 ppm, 5.25) with slope -0.34.
pub const CO_CURVE: (f32, f32, f32) = (2.3, 0.72, -0.34);

/// Smoke curve: through (200 ppm, 3.39) with slope -0.44.
pub const SMOKE_CURVE: (f32, f32, f32) = (2.3, 0.53, -0.44);

/// Slopes with a magnitude below this are treated as degenerate.
///
/// The boundary is part of the numeric contract; do not loosen it.
pub const MIN_CURVE_SLOPE: f32 = 1e-9;
