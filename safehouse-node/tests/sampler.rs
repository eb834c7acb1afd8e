//! Local sampling task

mod common;

use std::time::Duration;

use serde_json::json;

use common::{calm, commit, harness, SharedRawSampler};
use safehouse_connectors::MemoryTransport;
use safehouse_core::constants::alerts::CLIMATE_SENTINEL;
use safehouse_core::gas::{GasConcentrationEngine, GasSensorConfig};
use safehouse_core::reading::{DhtStatus, FusedReading};
use safehouse_core::time::FixedTime;
use safehouse_core::traits::{Climate, ClimateSensor, NoDelay};
use safehouse_node::tasks::LocalSampler;

const LOCK: Duration = Duration::from_millis(100);
const MID_SCALE: i32 = 2048;

type TestSampler = LocalSampler<SharedRawSampler, NoDelay, FixedTime>;

fn local(sampler: SharedRawSampler) -> TestSampler {
    LocalSampler::new(GasConcentrationEngine::new(
        sampler,
        NoDelay,
        FixedTime::new(0),
        GasSensorConfig::default(),
    ))
}

struct FixedClimate(Result<Climate, DhtStatus>);

impl ClimateSensor for FixedClimate {
    fn read_climate(&mut self) -> Result<Climate, DhtStatus> {
        self.0
    }
}

#[tokio::test]
async fn first_cycle_calibrates_and_commits_gas() {
    let h = harness();
    let mut sampler = local(SharedRawSampler::new(MID_SCALE));

    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert!(reading.gas_ppm.iter().all(|ppm| ppm.is_finite() && *ppm > 0.0));
    assert!(sampler.engine().unwrap().is_calibrated());

    let status = h.notifier.on_topic(&h.ctx.topics.status);
    assert_eq!(status.len(), 1);
    assert_eq!(status[0]["status"], json!("calibrated"));
    assert!(status[0]["baseline_kohm"].as_f64().unwrap() > 0.0);

    sampler.cycle(&h.ctx).await.unwrap();
    assert_eq!(h.notifier.on_topic(&h.ctx.topics.status).len(), 1);

    let state = h.ctx.store.snapshot(LOCK).await.unwrap();
    assert_eq!(state.reading.gas_ppm, reading.gas_ppm);
    assert_eq!(state.reading.dht_status, DhtStatus::Timeout);
}

#[tokio::test]
async fn calibration_failure_is_reported_until_a_retry_succeeds() {
    let h = harness();
    let raw = SharedRawSampler::new(0);
    let mut sampler = local(raw.clone());

    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert!(reading.gas_ppm.iter().all(|ppm| ppm.is_nan()));
    sampler.cycle(&h.ctx).await.unwrap();
    assert!(!sampler.engine().unwrap().is_calibrated());

    raw.set(MID_SCALE);
    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert!(reading.smoke_ppm().is_some());

    let status = h.notifier.on_topic(&h.ctx.topics.status);
    assert_eq!(status.len(), 2);
    assert_eq!(status[0], json!({ "status": "calibration_failed" }));
    assert_eq!(status[1]["status"], json!("calibrated"));
}

#[tokio::test]
async fn climate_motion_and_forwarding() {
    let h = harness();
    let transport = MemoryTransport::new(4);
    let mut sampler = local(SharedRawSampler::new(MID_SCALE))
        .with_climate(Box::new(FixedClimate(Ok(Climate { temperature: 23, humidity: 45 }))))
        .with_transport(Box::new(transport.clone()));

    assert!(h.ctx.motion.post());
    let reading = sampler.cycle(&h.ctx).await.unwrap();

    assert!(reading.motion);
    assert!(!h.ctx.motion.is_pending());
    assert_eq!(reading.climate(), Some(Climate { temperature: 23, humidity: 45 }));

    let frames = transport.drain();
    assert_eq!(frames.len(), 1);
    assert_eq!(FusedReading::from_bytes(&frames[0]).unwrap(), reading);
}

#[tokio::test]
async fn motion_stays_set_until_the_alert_task_clears_it() {
    let h = harness();
    let mut sampler = local(SharedRawSampler::new(MID_SCALE));

    h.ctx.motion.post();
    sampler.cycle(&h.ctx).await.unwrap();
    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert!(reading.motion);
}

#[tokio::test]
async fn failed_climate_read_uses_sentinels() {
    let h = harness();
    let mut sampler = local(SharedRawSampler::new(MID_SCALE))
        .with_climate(Box::new(FixedClimate(Err(DhtStatus::CrcError))));

    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert_eq!(reading.dht_status, DhtStatus::CrcError);
    assert_eq!(reading.temperature, CLIMATE_SENTINEL);
    assert_eq!(reading.humidity, CLIMATE_SENTINEL);
    assert_eq!(reading.climate(), None);
}

#[tokio::test]
async fn remote_climate_survives_local_gas_updates() {
    let h = harness();
    let mut sampler = local(SharedRawSampler::new(MID_SCALE));
    commit(&h.ctx, calm()).await;

    let reading = sampler.cycle(&h.ctx).await.unwrap();
    assert_eq!(reading.climate(), calm().climate());
    assert_ne!(reading.gas_ppm, calm().gas_ppm);
}

#[tokio::test]
async fn full_transport_does_not_fail_the_cycle() {
    let h = harness();
    let transport = MemoryTransport::new(1);
    let mut sampler = local(SharedRawSampler::new(MID_SCALE)).with_transport(Box::new(transport.clone()));

    sampler.cycle(&h.ctx).await.unwrap();
    sampler.cycle(&h.ctx).await.unwrap();
    assert_eq!(transport.len(), 1);
}
