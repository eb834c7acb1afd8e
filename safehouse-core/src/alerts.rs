//! Edge-triggered environmental alerts
//!
//! Every condition is a threshold comparison (`>=`) behind a latch. An
//! alert fires on the inactive to active transition only; it stays quiet
//! while the condition holds and re-arms once the value falls below
//! `threshold - hysteresis`. A reading with no valid value for a condition
//! (DHT failure, unknown smoke) re-arms that condition.

use heapless::Vec;

use crate::constants::alerts::{
    DEFAULT_HYSTERESIS, HUMIDITY_THRESHOLD_PCT, SMOKE_THRESHOLD_PPM, TEMPERATURE_THRESHOLD_C,
};
use crate::constants::buffers::ALERT_CONDITION_COUNT;
use crate::reading::FusedReading;

/// Conditions watched by the alert engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertKind {
    /// Temperature at or above its threshold
    HighTemperature,
    /// Humidity at or above its threshold
    HighHumidity,
    /// Smoke concentration at or above its threshold
    Smoke,
    /// Motion while nobody is inside
    MotionWhenEmpty,
}

/// How long an alert drives the buzzer and LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActuationClass {
    /// Short buzzer pulse
    Pulse,
    /// Long buzzer plus blinking LED
    Extended,
}

impl AlertKind {
    /// Evaluation order
    pub const ALL: [AlertKind; ALERT_CONDITION_COUNT] = [
        AlertKind::HighTemperature,
        AlertKind::HighHumidity,
        AlertKind::Smoke,
        AlertKind::MotionWhenEmpty,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Reason string published with the alert
    pub const fn reason(self) -> &'static str {
        match self {
            AlertKind::HighTemperature => "high_temperature",
            AlertKind::HighHumidity => "high_humidity",
            AlertKind::Smoke => "smoke_detected",
            AlertKind::MotionWhenEmpty => "motion_when_empty",
        }
    }

    /// Buzzer and LED pattern for this alert
    pub const fn actuation(self) -> ActuationClass {
        match self {
            AlertKind::MotionWhenEmpty => ActuationClass::Extended,
            _ => ActuationClass::Pulse,
        }
    }

    /// Persistent status line, for alerts the board does not overlay itself
    pub const fn status_message(self) -> Option<&'static str> {
        match self {
            AlertKind::HighTemperature => Some("ALERT: TEMP HIGH"),
            AlertKind::HighHumidity => Some("ALERT: HUMI HIGH"),
            AlertKind::Smoke | AlertKind::MotionWhenEmpty => None,
        }
    }
}

/// Alert trip points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlertThresholds {
    /// °C
    pub temperature_c: i32,
    /// %RH
    pub humidity_pct: i32,
    /// ppm
    pub smoke_ppm: f32,
    /// Re-arm band below each numeric threshold
    pub hysteresis: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_c: TEMPERATURE_THRESHOLD_C,
            humidity_pct: HUMIDITY_THRESHOLD_PCT,
            smoke_ppm: SMOKE_THRESHOLD_PPM,
            hysteresis: DEFAULT_HYSTERESIS,
        }
    }
}

/// Rising-edge latch for one condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    active: bool,
}

impl EdgeLatch {
    /// Inactive latch
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Whether the condition is currently latched
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed a numeric value; returns `true` on the rising edge
    ///
    /// `None` means the value is unavailable and clears the latch.
    pub fn update_value(&mut self, value: Option<f32>, threshold: f32, hysteresis: f32) -> bool {
        let Some(value) = value else {
            self.active = false;
            return false;
        };

        if self.active {
            if value < threshold - hysteresis {
                self.active = false;
            }
            false
        } else if value >= threshold {
            self.active = true;
            true
        } else {
            false
        }
    }

    /// Feed a boolean condition; returns `true` on the rising edge
    pub fn update(&mut self, condition: bool) -> bool {
        let fired = condition && !self.active;
        self.active = condition;
        fired
    }
}

/// Alerts fired by one evaluation, in evaluation order
pub type FiredAlerts = Vec<AlertKind, ALERT_CONDITION_COUNT>;

/// Per-condition latches over a stream of readings
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
    latches: [EdgeLatch; ALERT_CONDITION_COUNT],
}

impl AlertEvaluator {
    /// Evaluator with every latch clear
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds, latches: [EdgeLatch::new(); ALERT_CONDITION_COUNT] }
    }

    /// Trip points in use
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Whether `kind` is currently latched
    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.latches[kind.index()].is_active()
    }

    /// Evaluate a reading copied out of the store
    ///
    /// `occupancy` is the inside count read under the same lock as the
    /// reading.
    pub fn evaluate(&mut self, reading: &FusedReading, occupancy: u16) -> FiredAlerts {
        let t = self.thresholds;
        let climate = reading.climate();
        let mut fired = FiredAlerts::new();

        let checks = [
            (
                AlertKind::HighTemperature,
                self.latches[0].update_value(
                    climate.map(|c| c.temperature as f32),
                    t.temperature_c as f32,
                    t.hysteresis,
                ),
            ),
            (
                AlertKind::HighHumidity,
                self.latches[1].update_value(
                    climate.map(|c| c.humidity as f32),
                    t.humidity_pct as f32,
                    t.hysteresis,
                ),
            ),
            (
                AlertKind::Smoke,
                self.latches[2].update_value(reading.smoke_ppm(), t.smoke_ppm, t.hysteresis),
            ),
            (
                AlertKind::MotionWhenEmpty,
                self.latches[3].update(occupancy == 0 && reading.motion),
            ),
        ];

        for (kind, edge) in checks {
            if edge {
                log_error!("Alert: {}", kind.reason());
                // Capacity equals the number of conditions
                let _ = fired.push(kind);
            }
        }

        fired
    }
}

/// Strongest actuation needed by a set of fired alerts
pub fn strongest_actuation(fired: &[AlertKind]) -> Option<ActuationClass> {
    fired.iter().map(|kind| kind.actuation()).max()
}
