//! Time-Related Constants
//!
//! Polling periods, lock timeouts and actuation durations used by the node
//! tasks. All values are milliseconds unless the name says otherwise.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== POLLING PERIODS =====

/// Alert evaluation period (ms).
///
/// Two polls per second keeps alert latency well under the DHT11's own
/// 1 s sampling limit.
pub const ALERT_POLL_PERIOD_MS: u64 = 500;

/// Status display refresh period (ms).
pub const PRESENTATION_PERIOD_MS: u64 = 1000;

/// Local gas sampling period (ms).
///
/// Matches the concentration cache freshness window so every cycle
/// produces a fresh, mutually consistent set.
pub const SAMPLING_PERIOD_MS: u64 = 100;

// ===== LOCK TIMEOUTS =====

/// Store lock timeout for periodic tasks and scan handling (ms).
pub const LOCK_TIMEOUT_MS: u64 = 100;

/// Store lock timeout for the remote-receive callback and the motion-flag
/// reset (ms).
///
/// Shorter, because the receive path runs in the radio callback context.
pub const RECEIVE_LOCK_TIMEOUT_MS: u64 = 50;

// ===== ACTUATION =====

/// Buzzer/LED pulse for threshold alerts (ms).
pub const THRESHOLD_ALERT_PULSE_MS: u64 = 1000;

/// Buzzer/LED duration for motion in an empty warehouse (ms).
pub const UNOCCUPIED_MOTION_ALERT_MS: u64 = 10_000;

/// Buzzer duration for repeated unauthorized scans (ms).
pub const ACCESS_ESCALATION_ALERT_MS: u64 = 10_000;

/// Full on/off period of the blinking alert LED (ms).
pub const LED_BLINK_INTERVAL_MS: u64 = 250;

// ===== PRESENTATION =====

/// How long a temporary status message stays on the display (ms).
pub const STATUS_MESSAGE_TIMEOUT_MS: u64 = 5000;
