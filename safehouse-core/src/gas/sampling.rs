//! Averaging discipline shared by calibration and routine reads
//!
//! Take a fixed number of raw conversions spaced by a fixed interval,
//! convert each to a resistance, and keep only the physical ones. A failed
//! conversion or a non-physical raw value shrinks the denominator instead of
//! poisoning the mean.
//!
//! A conversion that stays pending past the poll budget counts as a
//! `SamplerError::Timeout` sample.

use super::resistance::GasResistanceModel;
use crate::errors::SamplerError;
use crate::traits::{Delay, RawSample, Sampler};

/// Accumulated resistance over one sampling window
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SampleWindow {
    /// Sum of the valid resistances (kΩ)
    pub sum: f32,
    /// Samples that produced a physical resistance
    pub valid: u16,
    /// Samples taken, valid or not
    pub attempted: u16,
}

impl SampleWindow {
    /// Mean of the valid samples, `None` if there were none
    pub fn mean(&self) -> Option<f32> {
        if self.valid == 0 {
            None
        } else {
            Some(self.sum / f32::from(self.valid))
        }
    }
}

/// Poll one conversion at most `max_polls` times (at least once)
fn poll<S: Sampler + ?Sized>(sampler: &mut S, max_polls: u32) -> Result<RawSample, SamplerError> {
    for _ in 0..max_polls.max(1) {
        match sampler.read_raw() {
            Ok(raw) => return Ok(raw),
            Err(nb::Error::Other(e)) => return Err(e),
            Err(nb::Error::WouldBlock) => {}
        }
    }
    Err(SamplerError::Timeout)
}

/// Collect `count` samples, delaying `interval_ms` between consecutive ones
pub(crate) fn collect<S, D>(
    model: &GasResistanceModel,
    sampler: &mut S,
    delay: &mut D,
    count: u16,
    interval_ms: u32,
    max_polls: u32,
) -> SampleWindow
where
    S: Sampler + ?Sized,
    D: Delay + ?Sized,
{
    let mut window = SampleWindow { sum: 0.0, valid: 0, attempted: count };

    for i in 0..count {
        match poll(sampler, max_polls) {
            Ok(raw) => match model.resistance(raw) {
                Ok(rs) if rs >= 0.0 => {
                    window.sum += rs;
                    window.valid += 1;
                }
                Ok(rs) => log_debug!("Sample {}: discarded resistance {} kOhm (raw {})", i, rs, raw),
                Err(e) => log_debug!("Sample {}: {}", i, e),
            },
            Err(e) => log_debug!("Sample {}: sampler error: {}", i, e),
        }

        if i + 1 < count {
            delay.delay_ms(interval_ms);
        }
    }

    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::gas::MAX_POLLS_PER_SAMPLE;
    use crate::traits::NoDelay;

    const POLLS: u32 = MAX_POLLS_PER_SAMPLE;

    struct Script<'a> {
        samples: &'a [nb::Result<RawSample, SamplerError>],
        pos: usize,
    }

    impl Sampler for Script<'_> {
        fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
            let sample = match &self.samples[self.pos % self.samples.len()] {
                Ok(raw) => Ok(*raw),
                Err(nb::Error::WouldBlock) => Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(e)) => Err(nb::Error::Other(*e)),
            };
            self.pos += 1;
            sample
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        calls: u32,
        total_ms: u32,
    }

    impl Delay for CountingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.calls += 1;
            self.total_ms += ms;
        }
    }

    #[test]
    fn invalid_samples_shrink_the_denominator() {
        let model = GasResistanceModel::new(5.0, 4095);
        let samples = [
            Ok(1000),
            Ok(0),
            Err(nb::Error::Other(SamplerError::Timeout)),
            Ok(1000),
        ];
        let mut sampler = Script { samples: &samples, pos: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 4, 10, POLLS);
        assert_eq!(window.valid, 2);
        assert_eq!(window.attempted, 4);
        assert!((window.mean().unwrap() - 15.475).abs() < 1e-4);
    }

    #[test]
    fn would_block_is_retried() {
        let model = GasResistanceModel::default();
        let samples = [Err(nb::Error::WouldBlock), Ok(2048)];
        let mut sampler = Script { samples: &samples, pos: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 1, 10, POLLS);
        assert_eq!(window.valid, 1);
        assert_eq!(sampler.pos, 2);
    }

    #[test]
    fn delays_only_between_samples() {
        let model = GasResistanceModel::default();
        let samples = [Ok(2000)];
        let mut sampler = Script { samples: &samples, pos: 0 };
        let mut delay = CountingDelay::default();

        collect(&model, &mut sampler, &mut delay, 5, 50, POLLS);
        assert_eq!(delay.calls, 4);
        assert_eq!(delay.total_ms, 200);
    }

    #[test]
    fn empty_window_has_no_mean() {
        let model = GasResistanceModel::default();
        let samples = [Ok(-3)];
        let mut sampler = Script { samples: &samples, pos: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 3, 0, POLLS);
        assert_eq!(window.mean(), None);
    }

    struct Stuck {
        polls: u32,
    }

    impl Sampler for Stuck {
        fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
            self.polls += 1;
            Err(nb::Error::WouldBlock)
        }
    }

    #[test]
    fn stuck_conversion_times_out() {
        let model = GasResistanceModel::default();
        let mut sampler = Stuck { polls: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 3, 0, 25);
        assert_eq!(window.valid, 0);
        assert_eq!(window.attempted, 3);
        assert_eq!(sampler.polls, 75);
    }

    #[test]
    fn zero_budget_still_polls_once() {
        let model = GasResistanceModel::default();
        let samples = [Ok(2048)];
        let mut sampler = Script { samples: &samples, pos: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 2, 0, 0);
        assert_eq!(window.valid, 2);
    }

    // Exercises the disabled logging shims in expression position
    #[cfg(not(feature = "log"))]
    #[test]
    fn collects_without_logging() {
        let model = GasResistanceModel::default();
        let samples = [Ok(0), Err(nb::Error::Other(SamplerError::Timeout)), Ok(2048)];
        let mut sampler = Script { samples: &samples, pos: 0 };

        let window = collect(&model, &mut sampler, &mut NoDelay, 3, 0, POLLS);
        assert_eq!(window.valid, 1);
    }
}
