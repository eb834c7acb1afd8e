//! JSON payload builders
//!
//! Unknown values (climate sentinels, NaN or negative gas readings) are
//! published as `null` rather than as the sentinel itself.

use serde_json::{json, Value};

use safehouse_core::access::{Identity, ScanOutcome};
use safehouse_core::alerts::AlertKind;
use safehouse_core::gas::GasChannel;
use safehouse_core::reading::FusedReading;

use crate::topics::Topics;

/// One publish: topic plus document
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub topic: String,
    pub payload: Value,
}

impl Message {
    fn new(topic: &str, payload: Value) -> Self {
        Self { topic: topic.to_string(), payload }
    }
}

/// `{"value": v}`
pub fn value<T: Into<Value>>(v: T) -> Value {
    json!({ "value": v.into() })
}

/// Gas concentration rounded to two decimals, `null` when unknown
pub fn ppm_value(ppm: Option<f32>) -> Value {
    match ppm {
        Some(v) if v.is_finite() && v >= 0.0 => {
            let rounded = (f64::from(v) * 100.0).round() / 100.0;
            value(rounded)
        }
        _ => value(Value::Null),
    }
}

/// Per-field messages for a committed reading
pub fn reading_messages(reading: &FusedReading, topics: &Topics) -> Vec<Message> {
    let climate = reading.climate();
    let mut out = Vec::with_capacity(6);

    out.push(Message::new(
        &topics.temperature,
        value(climate.map(|c| c.temperature)),
    ));
    out.push(Message::new(&topics.humidity, value(climate.map(|c| c.humidity))));
    for channel in GasChannel::ALL {
        out.push(Message::new(topics.gas(channel), ppm_value(reading.gas(channel))));
    }
    out.push(Message::new(&topics.motion, value(reading.motion)));
    out
}

/// Messages for one identity scan
///
/// Authorized scans report the action and the new inside count. Every
/// unauthorized scan is reported; an escalating one also raises an alert.
pub fn scan_messages(outcome: &ScanOutcome, identity: &Identity, topics: &Topics) -> Vec<Message> {
    let uid = identity.as_str();
    match *outcome {
        ScanOutcome::Entry { occupancy } => vec![
            Message::new(&topics.rfid, json!({ "status": "authorized", "action": "entry", "uid": uid })),
            Message::new(&topics.inside_count, value(occupancy)),
        ],
        ScanOutcome::Exit { occupancy } => vec![
            Message::new(&topics.rfid, json!({ "status": "authorized", "action": "exit", "uid": uid })),
            Message::new(&topics.inside_count, value(occupancy)),
        ],
        ScanOutcome::Denied { .. } => vec![
            Message::new(&topics.rfid, json!({ "status": "unauthorized", "uid": uid })),
        ],
        ScanOutcome::Escalated { .. } => vec![
            Message::new(&topics.rfid, json!({ "status": "unauthorized", "uid": uid })),
            Message::new(
                &topics.alert,
                json!({ "source": "rfid", "reason": "multiple_unauthorized", "uid": uid }),
            ),
        ],
    }
}

/// `{"source": "sensor", "reason": ...}`
pub fn sensor_alert(kind: AlertKind) -> Value {
    json!({ "source": "sensor", "reason": kind.reason() })
}

pub fn online() -> Value {
    json!({ "status": "online" })
}

pub fn calibration_failed() -> Value {
    json!({ "status": "calibration_failed" })
}

pub fn calibrated(baseline_kohm: f32) -> Value {
    json!({ "status": "calibrated", "baseline_kohm": f64::from(baseline_kohm) })
}
