//! In-memory connectors
//!
//! Record everything instead of sending it. Used by the node's tests and
//! for running the node without a broker or radio.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::{lock_stats, ConnectionStats, ConnectorError, Notifier, Transport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One recorded publish
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub topic: String,
    pub payload: Value,
}

/// Notifier that records publishes
///
/// Clones share the same log and connection flag.
#[derive(Debug, Clone)]
pub struct MemoryNotifier {
    log: Arc<Mutex<Vec<Published>>>,
    connected: Arc<AtomicBool>,
    stats: Arc<Mutex<ConnectionStats>>,
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNotifier {
    /// Connected notifier with an empty log
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
            stats: Arc::new(Mutex::new(ConnectionStats::default())),
        }
    }

    /// Simulate the broker link going up or down
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Snapshot of every publish so far
    pub fn published(&self) -> Vec<Published> {
        lock(&self.log).clone()
    }

    /// Publishes on one topic, oldest first
    pub fn on_topic(&self, topic: &str) -> Vec<Value> {
        lock(&self.log)
            .iter()
            .filter(|p| p.topic == topic)
            .map(|p| p.payload.clone())
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.log).clear();
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(&self, topic: &str, payload: &Value) -> Result<(), ConnectorError> {
        if !self.is_connected() {
            let error = ConnectorError::NotConnected;
            lock_stats(&self.stats).record_failed(&error);
            return Err(error);
        }

        let bytes = serde_json::to_vec(payload)?;
        lock(&self.log).push(Published { topic: topic.to_string(), payload: payload.clone() });
        lock_stats(&self.stats).record_sent(bytes.len());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn stats(&self) -> ConnectionStats {
        lock_stats(&self.stats).clone()
    }
}

/// Transport that queues frames in memory
///
/// Clones share the same queue; `capacity` bounds it and a full queue
/// rejects further frames with `BufferFull`.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    capacity: usize,
}

impl MemoryTransport {
    pub fn new(capacity: usize) -> Self {
        Self { frames: Arc::new(Mutex::new(Vec::new())), capacity }
    }

    /// Remove and return every queued frame
    pub fn drain(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *lock(&self.frames))
    }

    pub fn len(&self) -> usize {
        lock(&self.frames).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, payload: &[u8]) -> Result<(), ConnectorError> {
        let mut frames = lock(&self.frames);
        if frames.len() >= self.capacity {
            return Err(ConnectorError::BufferFull);
        }
        frames.push(payload.to_vec());
        Ok(())
    }
}
