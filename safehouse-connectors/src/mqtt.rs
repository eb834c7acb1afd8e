//! MQTT notifier
//!
//! Publishes JSON documents with QoS 1 through `rumqttc`. The client is
//! split in two halves:
//!
//! - [`MqttNotifier`] publishes and can be shared between tasks
//! - [`MqttDriver`] owns the event loop and must be polled (spawned) for
//!   anything to reach the broker
//!
//! The driver tracks the link state. Publishing while the link is down
//! fails fast with `NotConnected`; the event loop reconnects on its own.
//!
//! ```rust,no_run
//! use safehouse_connectors::mqtt::{MqttConfig, MqttNotifier};
//!
//! # async fn example() {
//! let (notifier, driver) = MqttNotifier::new(MqttConfig::default());
//! tokio::spawn(driver.run());
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{lock_stats, ConnectionStats, ConnectorError, Notifier};

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    /// Outgoing request queue depth
    pub capacity: usize,
    /// Pause before polling again after a connection error
    pub reconnect_delay_ms: u64,
    /// Prefix for every published topic
    pub topic_prefix: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "test.mosquitto.org".to_string(),
            port: 1883,
            client_id: "safehouse-node".to_string(),
            keep_alive_secs: 60,
            capacity: 32,
            reconnect_delay_ms: 1000,
            topic_prefix: crate::topics::DEFAULT_PREFIX.to_string(),
        }
    }
}

impl MqttConfig {
    /// Topic table for the configured prefix
    pub fn topics(&self) -> crate::Topics {
        crate::Topics::new(&self.topic_prefix)
    }

    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.host.is_empty() {
            return Err(ConnectorError::ConfigError("broker host is empty".into()));
        }
        if self.client_id.is_empty() {
            return Err(ConnectorError::ConfigError("client id is empty".into()));
        }
        if self.keep_alive_secs < 5 {
            return Err(ConnectorError::ConfigError("keep-alive must be at least 5 s".into()));
        }
        Ok(())
    }
}

/// Publishing half of the MQTT client
#[derive(Clone)]
pub struct MqttNotifier {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
    link: watch::Receiver<bool>,
    stats: Arc<Mutex<ConnectionStats>>,
}

/// Event-loop half of the MQTT client
pub struct MqttDriver {
    eventloop: EventLoop,
    connected: Arc<AtomicBool>,
    link: watch::Sender<bool>,
    stats: Arc<Mutex<ConnectionStats>>,
    reconnect_delay: Duration,
}

impl MqttNotifier {
    /// Create both halves; nothing connects until the driver runs
    pub fn new(config: MqttConfig) -> (Self, MqttDriver) {
        let mut options = MqttOptions::new(config.client_id, config.host, config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(options, config.capacity);
        let connected = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(Mutex::new(ConnectionStats::default()));
        let (link_tx, link_rx) = watch::channel(false);

        let notifier = Self {
            client,
            connected: Arc::clone(&connected),
            link: link_rx,
            stats: Arc::clone(&stats),
        };
        let driver = MqttDriver {
            eventloop,
            connected,
            link: link_tx,
            stats,
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
        };
        (notifier, driver)
    }

    /// Receiver that flips to `true` on every (re)connect and `false` on
    /// every loss
    pub fn link_state(&self) -> watch::Receiver<bool> {
        self.link.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MqttNotifier {
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> Result<(), ConnectorError> {
        if !self.is_connected() {
            log::warn!("MQTT not connected, cannot publish to {}", topic);
            let error = ConnectorError::NotConnected;
            lock_stats(&self.stats).record_failed(&error);
            return Err(error);
        }

        let bytes = serde_json::to_vec(payload)?;
        let len = bytes.len();

        match self.client.publish(topic, QoS::AtLeastOnce, false, bytes).await {
            Ok(()) => {
                log::debug!("MQTT published to {}: {}", topic, payload);
                lock_stats(&self.stats).record_sent(len);
                Ok(())
            }
            Err(e) => {
                log::error!("MQTT failed to publish to {}: {}", topic, e);
                let error = ConnectorError::ProtocolError(e.to_string());
                lock_stats(&self.stats).record_failed(&error);
                Err(error)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn stats(&self) -> ConnectionStats {
        lock_stats(&self.stats).clone()
    }
}

impl MqttDriver {
    fn set_link(&self, up: bool) {
        let was = self.connected.swap(up, Ordering::AcqRel);
        if was != up {
            // No receivers is fine; the flag above is authoritative
            let _ = self.link.send(up);
        }
    }

    /// Poll the event loop forever
    pub async fn run(mut self) {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    log::info!("MQTT connected");
                    self.set_link(true);
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    log::warn!("MQTT broker closed the session");
                    self.set_link(false);
                }
                Ok(_) => {}
                Err(e) => {
                    if self.connected.load(Ordering::Acquire) {
                        lock_stats(&self.stats).reconnections += 1;
                    }
                    log::error!("MQTT connection error: {}", e);
                    lock_stats(&self.stats).last_error = Some(e.to_string());
                    self.set_link(false);
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }
}
