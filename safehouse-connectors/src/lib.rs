//! Notification and Transport Connectors for the SafeHouse Node
//!
//! ## Overview
//!
//! The node talks to the outside world over two very different links:
//!
//! - a **notification channel** (MQTT broker) where every reading, scan and
//!   alert is published as a small JSON document, fire-and-forget
//! - a **transport** to or from the sensing node carrying the fixed-size
//!   fused reading frame, best-effort and unacknowledged
//!
//! Both are traits so the node's tasks can be driven by in-memory fakes in
//! tests and by real clients on the device.
//!
//! ## Delivery Semantics
//!
//! Neither link retries synchronously. A failed publish is logged and
//! counted in [`ConnectionStats`]; the next cycle publishes fresh data
//! anyway. Publishing while the broker link is down fails fast with
//! [`ConnectorError::NotConnected`] instead of queueing stale messages.
//!
//! ## Topic Layout
//!
//! ```text
//! <prefix>/temperature      {"value": 23}
//! <prefix>/humidity         {"value": 40}
//! <prefix>/gas/lpg          {"value": 12.34}   null when unknown
//! <prefix>/gas/co           {"value": 1.02}
//! <prefix>/gas/smoke        {"value": 80.5}
//! <prefix>/motion           {"value": true}
//! <prefix>/inside_count     {"value": 2}
//! <prefix>/rfid             {"status": "authorized", "action": "entry", "uid": "..."}
//! <prefix>/alert            {"source": "sensor", "reason": "smoke_detected"}
//! <prefix>/status           {"status": "online"}
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use safehouse_connectors::{MemoryNotifier, Notifier, Topics, payload};
//!
//! # async fn example() -> Result<(), safehouse_connectors::ConnectorError> {
//! let topics = Topics::default();
//! let notifier = MemoryNotifier::new();
//!
//! notifier.publish(&topics.status, &payload::online()).await?;
//! assert_eq!(notifier.published().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod memory;
#[cfg(feature = "mqtt")]
pub mod mqtt;
pub mod payload;
pub mod topics;

pub use memory::{MemoryNotifier, MemoryTransport, Published};
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttDriver, MqttNotifier};
pub use topics::Topics;

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,

    #[error("Buffer full")]
    BufferFull,

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outbound link carrying encoded fused readings to a peer node
///
/// Best-effort: `Ok` means the frame was handed to the link, not that it
/// arrived.
pub trait Transport: Send {
    /// Send one encoded frame
    fn send(&mut self, payload: &[u8]) -> Result<(), ConnectorError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, payload: &[u8]) -> Result<(), ConnectorError> {
        (**self).send(payload)
    }
}

/// Publish side of the notification channel
///
/// Shared between tasks behind an `Arc`, so every method takes `&self`.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Publish a JSON document on a topic
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> Result<(), ConnectorError>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Get connection statistics
    fn stats(&self) -> ConnectionStats;
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Number of reconnections
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_failed(&mut self, error: &ConnectorError) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}

/// Lock a stats mutex, recovering the data if a holder panicked
pub(crate) fn lock_stats(
    stats: &std::sync::Mutex<ConnectionStats>,
) -> std::sync::MutexGuard<'_, ConnectionStats> {
    stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
