//! Shared fixtures for the core integration tests
//!
//! - Scripted samplers that replay raw readings and count invocations
//! - A delay provider that records requested waits
//! - Reading builders and a tolerance assertion

#![allow(dead_code)]

use std::collections::VecDeque;

use safehouse_core::errors::SamplerError;
use safehouse_core::reading::{DhtStatus, FusedReading};
use safehouse_core::traits::{Delay, RawSample, Sampler};

/// Replays a script of raw readings, then repeats the last one
pub struct ScriptedSampler {
    script: VecDeque<Result<RawSample, SamplerError>>,
    last: Result<RawSample, SamplerError>,
    calls: usize,
}

impl ScriptedSampler {
    pub fn new(script: &[Result<RawSample, SamplerError>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            last: script.last().copied().unwrap_or(Err(SamplerError::Timeout)),
            calls: 0,
        }
    }

    /// Always returns the same raw value
    pub fn constant(raw: RawSample) -> Self {
        Self::new(&[Ok(raw)])
    }

    /// Replace the steady-state value
    pub fn set(&mut self, raw: RawSample) {
        self.script.clear();
        self.last = Ok(raw);
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Sampler for ScriptedSampler {
    fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
        self.calls += 1;
        let next = self.script.pop_front().unwrap_or(self.last);
        next.map_err(nb::Error::Other)
    }
}

/// Records every requested delay
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub waits: Vec<u32>,
}

impl Delay for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
    }
}

/// Valid reading with the given climate and smoke level
pub fn reading(temperature: i32, humidity: i32, smoke_ppm: f32, motion: bool) -> FusedReading {
    FusedReading {
        temperature,
        humidity,
        dht_status: DhtStatus::Ok,
        gas_ppm: [1.0, 1.0, smoke_ppm],
        motion,
    }
}

/// Raw reading that produces resistance `rs` through a divider with load
/// `rl` and full scale `adc_max`
pub fn raw_for_resistance(rs: f32, rl: f32, adc_max: RawSample) -> RawSample {
    (adc_max as f32 * rl / (rs + rl)).round() as RawSample
}

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}
