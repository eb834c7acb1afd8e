//! Static node configuration
//!
//! Loaded once at startup from JSON. Every section and every field is
//! optional; missing values take the defaults the node ships with.
//!
//! ```json
//! {
//!   "gas": { "clean_air_ratio": 9.83 },
//!   "alerts": { "smoke_ppm": 400.0 },
//!   "access": { "roster": ["04 A3 2B 1C"], "escalation_limit": 3 },
//!   "mqtt": { "host": "broker.local", "topic_prefix": "warehouse" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use safehouse_connectors::MqttConfig;
use safehouse_core::access::AccessControlEngine;
use safehouse_core::alerts::AlertThresholds;
use safehouse_core::constants::alerts::UNAUTHORIZED_ATTEMPT_LIMIT;
use safehouse_core::constants::buffers::MAX_AUTHORIZED_IDS;
use safehouse_core::constants::time::{
    ACCESS_ESCALATION_ALERT_MS, ALERT_POLL_PERIOD_MS, LED_BLINK_INTERVAL_MS, LOCK_TIMEOUT_MS,
    PRESENTATION_PERIOD_MS, RECEIVE_LOCK_TIMEOUT_MS, SAMPLING_PERIOD_MS,
    STATUS_MESSAGE_TIMEOUT_MS, THRESHOLD_ALERT_PULSE_MS, UNOCCUPIED_MOTION_ALERT_MS,
};
use safehouse_core::gas::GasSensorConfig;

use crate::errors::{NodeError, NodeResult};

/// Authorized roster and escalation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub roster: Vec<String>,
    /// Consecutive unauthorized scans before escalating
    pub escalation_limit: u8,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self { roster: Vec::new(), escalation_limit: UNAUTHORIZED_ATTEMPT_LIMIT }
    }
}

/// Task periods and lock timeouts, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub alert_period_ms: u64,
    pub presentation_period_ms: u64,
    pub sampling_period_ms: u64,
    pub lock_timeout_ms: u64,
    /// Lock timeout for remote frames and the motion-flag reset
    pub receive_lock_timeout_ms: u64,
    pub status_message_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            alert_period_ms: ALERT_POLL_PERIOD_MS,
            presentation_period_ms: PRESENTATION_PERIOD_MS,
            sampling_period_ms: SAMPLING_PERIOD_MS,
            lock_timeout_ms: LOCK_TIMEOUT_MS,
            receive_lock_timeout_ms: RECEIVE_LOCK_TIMEOUT_MS,
            status_message_timeout_ms: STATUS_MESSAGE_TIMEOUT_MS,
        }
    }
}

impl TimingConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn receive_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_lock_timeout_ms)
    }

    pub fn alert_period(&self) -> Duration {
        Duration::from_millis(self.alert_period_ms)
    }

    pub fn presentation_period(&self) -> Duration {
        Duration::from_millis(self.presentation_period_ms)
    }

    pub fn sampling_period(&self) -> Duration {
        Duration::from_millis(self.sampling_period_ms)
    }
}

/// Buzzer and LED durations, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuationConfig {
    pub threshold_pulse_ms: u64,
    pub unoccupied_motion_ms: u64,
    pub escalation_ms: u64,
    pub led_blink_interval_ms: u64,
}

impl Default for ActuationConfig {
    fn default() -> Self {
        Self {
            threshold_pulse_ms: THRESHOLD_ALERT_PULSE_MS,
            unoccupied_motion_ms: UNOCCUPIED_MOTION_ALERT_MS,
            escalation_ms: ACCESS_ESCALATION_ALERT_MS,
            led_blink_interval_ms: LED_BLINK_INTERVAL_MS,
        }
    }
}

impl ActuationConfig {
    pub fn threshold_pulse(&self) -> Duration {
        Duration::from_millis(self.threshold_pulse_ms)
    }

    pub fn unoccupied_motion(&self) -> Duration {
        Duration::from_millis(self.unoccupied_motion_ms)
    }

    pub fn escalation(&self) -> Duration {
        Duration::from_millis(self.escalation_ms)
    }

    pub fn led_blink_interval(&self) -> Duration {
        Duration::from_millis(self.led_blink_interval_ms)
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub gas: GasSensorConfig,
    pub alerts: AlertThresholds,
    pub access: AccessConfig,
    pub timing: TimingConfig,
    pub actuation: ActuationConfig,
    pub mqtt: MqttConfig,
}

impl NodeConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> NodeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> NodeResult<()> {
        if self.access.roster.len() > MAX_AUTHORIZED_IDS {
            return Err(NodeError::InvalidConfig(format!(
                "roster has {} entries, capacity is {}",
                self.access.roster.len(),
                MAX_AUTHORIZED_IDS
            )));
        }
        self.access_engine()?;

        if self.gas.adc_max <= 0 {
            return Err(NodeError::InvalidConfig(format!(
                "ADC full scale must be positive, got {}",
                self.gas.adc_max
            )));
        }
        if !(self.gas.load_resistance_kohm > 0.0) {
            return Err(NodeError::InvalidConfig(format!(
                "load resistance must be positive, got {} kOhm",
                self.gas.load_resistance_kohm
            )));
        }
        if !(self.gas.clean_air_ratio > 0.0) {
            return Err(NodeError::InvalidConfig(format!(
                "clean-air ratio must be positive, got {}",
                self.gas.clean_air_ratio
            )));
        }
        if self.gas.read_samples == 0 || self.gas.calibration_samples == 0 {
            return Err(NodeError::InvalidConfig("sample counts must be non-zero".into()));
        }
        if self.gas.max_polls_per_sample == 0 {
            return Err(NodeError::InvalidConfig("poll budget must be non-zero".into()));
        }

        let t = &self.timing;
        if [t.alert_period_ms, t.presentation_period_ms, t.sampling_period_ms]
            .iter()
            .any(|&p| p == 0)
        {
            return Err(NodeError::InvalidConfig("task periods must be non-zero".into()));
        }
        if self.actuation.led_blink_interval_ms == 0 {
            return Err(NodeError::InvalidConfig("LED blink interval must be non-zero".into()));
        }

        self.mqtt.validate()?;
        Ok(())
    }

    /// Access engine populated from the roster
    pub fn access_engine(&self) -> NodeResult<AccessControlEngine> {
        let roster = self.access.roster.iter().map(String::as_str);
        Ok(AccessControlEngine::with_roster(self.access.escalation_limit, roster)?)
    }
}
