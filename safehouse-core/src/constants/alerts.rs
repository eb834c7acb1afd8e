//! Alert Thresholds and Sentinels
//!
//! Default trip points for the environmental alert conditions and the
//! sentinel values carried by invalid readings.

// ===== THRESHOLDS =====

/// Air temperature that trips the high-temperature alert (°C).
///
/// Well above any normal storage temperature; a warehouse reaching this
/// is on fire or has lost ventilation.
pub const TEMPERATURE_THRESHOLD_C: i32 = 60;

/// Relative humidity that trips the high-humidity alert (%).
///
/// Sustained RH above 85% damages paper and electronics stock.
pub const HUMIDITY_THRESHOLD_PCT: i32 = 85;

/// Smoke concentration that trips the smoke alert (ppm).
pub const SMOKE_THRESHOLD_PPM: f32 = 500.0;

/// Default hysteresis band. Zero gives a plain `>=` latch.
pub const DEFAULT_HYSTERESIS: f32 = 0.0;

// ===== ACCESS CONTROL =====

/// Consecutive scans of the same unknown identity that escalate.
pub const UNAUTHORIZED_ATTEMPT_LIMIT: u8 = 3;

// ===== SENTINELS =====

/// Temperature/humidity value carried when the DHT reading is not valid.
pub const CLIMATE_SENTINEL: i32 = -99;
