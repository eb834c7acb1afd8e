//! Constants for SafeHouse Core
//!
//! Centralized, documented constants used throughout the node. Every numeric
//! default in the configuration types comes from here.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Gas**: sensor electrics, sampling discipline, concentration curves
//! - **Alerts**: trip points, escalation limit, sentinels
//! - **Time**: polling periods, lock timeouts, actuation durations
//! - **Buffers**: fixed capacities
//!
//! ## Usage Guidelines
//!
//! 1. Use these constants instead of magic numbers
//! 2. Include units in the name
//! 3. Reference the datasheet or field experience behind a value

/// Gas sensor electrics, sampling and curve constants.
pub mod gas;

/// Alert thresholds, escalation limit and sentinels.
pub mod alerts;

/// Polling periods, lock timeouts and actuation durations.
pub mod time;

/// Fixed capacities for statically sized collections.
pub mod buffers;

pub use gas::{
    ADC_MAX_12BIT, DEFAULT_LOAD_RESISTANCE_KOHM, CLEAN_AIR_RATIO,
    CACHE_FRESHNESS_MS, MIN_CURVE_SLOPE,
};

pub use alerts::{
    TEMPERATURE_THRESHOLD_C, HUMIDITY_THRESHOLD_PCT, SMOKE_THRESHOLD_PPM,
    UNAUTHORIZED_ATTEMPT_LIMIT, CLIMATE_SENTINEL,
};

pub use time::{
    MS_PER_SECOND, ALERT_POLL_PERIOD_MS, PRESENTATION_PERIOD_MS,
    LOCK_TIMEOUT_MS, RECEIVE_LOCK_TIMEOUT_MS,
};

pub use buffers::{
    MAX_AUTHORIZED_IDS, MAX_IDENTITY_LEN, DISPLAY_LINE_WIDTH,
};
