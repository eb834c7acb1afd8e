//! Shared fixtures for the node integration tests
//!
//! - A node context wired to an in-memory notifier and recording pins
//! - A sampler whose raw value can be changed after the engine owns it
//! - Reading builders

#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use safehouse_connectors::MemoryNotifier;
use safehouse_core::errors::SamplerError;
use safehouse_core::reading::{DhtStatus, FusedReading};
use safehouse_core::traits::{RawSample, Sampler};
use safehouse_node::{Annunciator, NodeConfig, NodeContext, RecordingIndicator};

pub const ROSTER: [&str; 2] = ["04 A3 2B 1C", "7F 00 12 9E"];

/// Context plus handles on everything it talks to
pub struct Harness {
    pub ctx: NodeContext,
    pub notifier: MemoryNotifier,
    pub buzzer: RecordingIndicator,
    pub led: RecordingIndicator,
}

pub fn config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.access.roster = ROSTER.iter().map(|id| id.to_string()).collect();
    config
}

pub fn harness() -> Harness {
    harness_with(config())
}

pub fn harness_with(config: NodeConfig) -> Harness {
    let notifier = MemoryNotifier::new();
    let buzzer = RecordingIndicator::new();
    let led = RecordingIndicator::new();
    let annunciator = Annunciator::new(
        Box::new(buzzer.clone()),
        Box::new(led.clone()),
        config.actuation.led_blink_interval(),
    );
    let ctx = NodeContext::new(config, Arc::new(notifier.clone()), annunciator)
        .expect("valid test configuration");
    Harness { ctx, notifier, buzzer, led }
}

/// Sampler reading a raw value shared with the test
#[derive(Debug, Clone, Default)]
pub struct SharedRawSampler {
    raw: Arc<AtomicI32>,
}

impl SharedRawSampler {
    pub fn new(raw: RawSample) -> Self {
        Self { raw: Arc::new(AtomicI32::new(raw)) }
    }

    pub fn set(&self, raw: RawSample) {
        self.raw.store(raw, Ordering::Relaxed);
    }
}

impl Sampler for SharedRawSampler {
    fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
        Ok(self.raw.load(Ordering::Relaxed))
    }
}

/// Valid climate with the given gas and motion values
pub fn reading(temperature: i32, humidity: i32, smoke: f32, motion: bool) -> FusedReading {
    FusedReading {
        temperature,
        humidity,
        dht_status: DhtStatus::Ok,
        gas_ppm: [1.5, 0.25, smoke],
        motion,
    }
}

/// Quiet reading: nothing above any default threshold
pub fn calm() -> FusedReading {
    reading(22, 40, 10.0, false)
}

/// Commit a reading as if it had arrived from the remote node
pub async fn commit(ctx: &NodeContext, reading: FusedReading) {
    ctx.store
        .with_lock(ctx.config.timing.lock_timeout(), |state| state.reading = reading)
        .await
        .expect("store lock");
}
