//! Calibrated concentration estimation with per-channel caching
//!
//! The engine owns the analog front end, the delay provider and a clock.
//! Single-channel reads are served from a short-lived cache; `read_all`
//! always takes one fresh resistance sample and derives every channel from
//! it, so the three values describe the same instant.

use super::calibration::{CalibrationState, GasCalibrationEngine};
use super::curve::{self, GasChannel};
use super::sampling;
use super::GasSensorConfig;
use crate::errors::{CalibrationError, GasResult, PpmError, ReadError};
use crate::time::{elapsed_ms, TimeSource, Timestamp};
use crate::traits::{Delay, Sampler};

/// Cached concentration for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
struct CachedPpm {
    value: f32,
    timestamp: Timestamp,
}

/// Concentrations derived from a single resistance sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasConcentrations {
    /// Averaged sensor resistance Rs (kΩ)
    pub resistance: f32,
    /// Rs/Ro
    pub ratio: f32,
    /// Per-channel results, indexed by `GasChannel::index`
    pub channels: [Result<f32, PpmError>; 3],
}

impl GasConcentrations {
    /// Result for one channel
    pub fn get(&self, channel: GasChannel) -> Result<f32, PpmError> {
        self.channels[channel.index()]
    }

    /// ppm per channel with failed channels mapped to NaN
    pub fn to_ppm_array(&self) -> [f32; 3] {
        let mut out = [f32::NAN; 3];
        for (slot, result) in out.iter_mut().zip(self.channels.iter()) {
            if let Ok(value) = result {
                *slot = *value;
            }
        }
        out
    }
}

/// Gas concentration engine
///
/// Reads are refused with `ReadError::NotCalibrated` until `begin`
/// succeeds.
pub struct GasConcentrationEngine<S, D, C> {
    sampler: S,
    delay: D,
    clock: C,
    config: GasSensorConfig,
    calibration: CalibrationState,
    cache: [Option<CachedPpm>; 3],
}

impl<S, D, C> GasConcentrationEngine<S, D, C>
where
    S: Sampler,
    D: Delay,
    C: TimeSource,
{
    /// Create an uncalibrated engine
    pub fn new(sampler: S, delay: D, clock: C, config: GasSensorConfig) -> Self {
        let calibration = CalibrationState::unset(config.load_resistance_kohm, config.clean_air_ratio);
        Self {
            sampler,
            delay,
            clock,
            config,
            calibration,
            cache: [None; 3],
        }
    }

    /// Static configuration
    pub fn config(&self) -> &GasSensorConfig {
        &self.config
    }

    /// Current calibration state
    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    /// Underlying sampler
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Underlying sampler, mutably
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Calibrate in clean air and commit the baseline
    ///
    /// Fails with `AlreadyCalibrated` if a baseline is set; call `deinit`
    /// first to recalibrate.
    pub fn begin(&mut self) -> Result<f32, CalibrationError> {
        if self.calibration.is_set() {
            return Err(CalibrationError::AlreadyCalibrated);
        }

        let calibrator = GasCalibrationEngine::new(self.config.model(), self.config.clean_air_ratio)
            .with_poll_budget(self.config.max_polls_per_sample);
        let result = calibrator.calibrate(
            &mut self.sampler,
            &mut self.delay,
            self.config.calibration_samples,
            self.config.calibration_interval_ms,
        );

        let baseline = match result {
            Ok(baseline) => baseline,
            Err(e) => {
                log_error!("Gas sensor calibration failed: {}", e);
                return Err(e);
            }
        };

        self.calibration.commit(baseline)?;
        self.clear_cache();
        Ok(baseline)
    }

    /// Drop the baseline and every cached value
    pub fn deinit(&mut self) {
        self.calibration.reset();
        self.clear_cache();
        log_info!("Gas sensor deinitialized");
    }

    /// Whether a baseline is committed
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_set()
    }

    /// Baseline resistance, or `NotCalibrated`
    pub fn check_calibration(&self) -> Result<f32, ReadError> {
        self.calibration.baseline().ok_or(ReadError::NotCalibrated)
    }

    /// Baseline resistance Ro (kΩ), if calibrated
    pub fn baseline(&self) -> Option<f32> {
        self.calibration.baseline()
    }

    /// Averaged resistance over a read window
    pub fn read_resistance(&mut self, sample_count: u16, sample_interval_ms: u32) -> Result<f32, ReadError> {
        let model = self.config.model();
        let window = sampling::collect(
            &model,
            &mut self.sampler,
            &mut self.delay,
            sample_count,
            sample_interval_ms,
            self.config.max_polls_per_sample,
        );
        window
            .mean()
            .ok_or(ReadError::NoValidSamples { attempted: window.attempted })
    }

    fn fresh_resistance(&mut self) -> Result<f32, ReadError> {
        let (count, interval) = (self.config.read_samples, self.config.read_interval_ms);
        self.read_resistance(count, interval).map_err(|e| {
            log_warn!("Gas resistance read failed: {}", e);
            e
        })
    }

    /// Concentration on one channel, served from cache while fresh
    pub fn read_channel(&mut self, channel: GasChannel) -> GasResult<f32> {
        let baseline = self.check_calibration()?;
        let idx = channel.index();

        if let Some(entry) = self.cache[idx] {
            if elapsed_ms(entry.timestamp, self.clock.now()) < self.config.cache_freshness_ms {
                return Ok(entry.value);
            }
        }

        let resistance = self.fresh_resistance()?;
        let ratio = resistance / baseline;
        let result = curve::ppm(ratio, self.config.curves[idx].as_ref());

        log_debug!(
            "{}: Rs = {} kOhm, Rs/Ro = {}, result {:?}",
            channel.name(), resistance, ratio, result
        );

        self.store(channel, result, self.clock.now());
        Ok(result?)
    }

    /// LPG (ppm)
    pub fn read_lpg(&mut self) -> GasResult<f32> {
        self.read_channel(GasChannel::Lpg)
    }

    /// CO (ppm)
    pub fn read_co(&mut self) -> GasResult<f32> {
        self.read_channel(GasChannel::Co)
    }

    /// Smoke (ppm)
    pub fn read_smoke(&mut self) -> GasResult<f32> {
        self.read_channel(GasChannel::Smoke)
    }

    /// Every channel from one fresh sample, bypassing and refreshing the
    /// cache
    pub fn read_all(&mut self) -> GasResult<GasConcentrations> {
        let baseline = self.check_calibration()?;
        let resistance = self.fresh_resistance()?;
        let ratio = resistance / baseline;

        let mut channels = [Err(PpmError::MissingCurve); 3];
        for channel in GasChannel::ALL {
            channels[channel.index()] = curve::ppm(ratio, self.config.curves[channel.index()].as_ref());
        }

        let now = self.clock.now();
        for channel in GasChannel::ALL {
            self.store(channel, channels[channel.index()], now);
        }

        log_debug!(
            "Rs = {} kOhm, Rs/Ro = {}, lpg {:?}, co {:?}, smoke {:?}",
            resistance, ratio, channels[0], channels[1], channels[2]
        );

        Ok(GasConcentrations { resistance, ratio, channels })
    }

    fn store(&mut self, channel: GasChannel, result: Result<f32, PpmError>, now: Timestamp) {
        self.cache[channel.index()] = match result {
            Ok(value) if value.is_finite() => Some(CachedPpm { value, timestamp: now }),
            _ => None,
        };
    }

    fn clear_cache(&mut self) {
        self.cache = [None; 3];
    }
}
