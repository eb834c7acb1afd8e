//! Clean-air calibration
//!
//! The baseline resistance Ro is the mean resistance in clean air divided by
//! the datasheet clean-air ratio (Rs/Ro in clean air, 9.83 for MQ-2 class
//! sensors). The caller owns the preconditions: the heater must be warm and
//! the atmosphere clean. Neither is checked here.

use super::resistance::GasResistanceModel;
use super::sampling;
use crate::constants::gas::MAX_POLLS_PER_SAMPLE;
use crate::errors::CalibrationError;
use crate::traits::{Delay, Sampler};

/// Calibration state shared by the concentration engine
///
/// `baseline` is `None` until a calibration succeeds and is strictly
/// positive afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationState {
    baseline: Option<f32>,
    /// Load resistor (kΩ)
    pub load_resistance: f32,
    /// Rs/Ro in clean air
    pub clean_air_ratio: f32,
}

impl CalibrationState {
    /// Unset state for the given constants
    pub const fn unset(load_resistance: f32, clean_air_ratio: f32) -> Self {
        Self { baseline: None, load_resistance, clean_air_ratio }
    }

    /// Baseline resistance Ro, if calibrated
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Whether a baseline has been committed
    pub fn is_set(&self) -> bool {
        self.baseline.is_some()
    }

    /// Commit a baseline; only strictly positive values are accepted
    pub(crate) fn commit(&mut self, baseline: f32) -> Result<(), CalibrationError> {
        if !(baseline > 0.0) {
            return Err(CalibrationError::NonPositiveBaseline { baseline });
        }
        self.baseline = Some(baseline);
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.baseline = None;
    }
}

/// Computes the baseline resistance from repeated clean-air samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCalibrationEngine {
    model: GasResistanceModel,
    clean_air_ratio: f32,
    max_polls: u32,
}

impl GasCalibrationEngine {
    /// Engine for the given divider model and clean-air ratio
    pub const fn new(model: GasResistanceModel, clean_air_ratio: f32) -> Self {
        Self { model, clean_air_ratio, max_polls: MAX_POLLS_PER_SAMPLE }
    }

    /// Polls of a pending conversion before that sample is given up
    pub const fn with_poll_budget(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    /// Divider model used to convert raw readings
    pub fn model(&self) -> &GasResistanceModel {
        &self.model
    }

    /// Rs/Ro in clean air
    pub fn clean_air_ratio(&self) -> f32 {
        self.clean_air_ratio
    }

    /// Sample `sample_count` times, `sample_interval_ms` apart, and return
    /// the baseline resistance in kΩ
    ///
    /// # Errors
    ///
    /// - `NoValidSamples` when every sample was rejected
    /// - `InvalidCleanAirRatio` when the ratio is not strictly positive
    /// - `NonPositiveBaseline` when every valid sample was saturated
    ///
    /// # Example
    ///
    /// ```rust
    /// use safehouse_core::gas::{GasCalibrationEngine, GasResistanceModel};
    /// use safehouse_core::traits::{NoDelay, RawSample, Sampler};
    /// use safehouse_core::errors::SamplerError;
    ///
    /// struct Constant(RawSample);
    /// impl Sampler for Constant {
    ///     fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
    ///         Ok(self.0)
    ///     }
    /// }
    ///
    /// let engine = GasCalibrationEngine::new(GasResistanceModel::new(5.0, 4095), 9.83);
    /// let baseline = engine.calibrate(&mut Constant(1000), &mut NoDelay, 10, 0).unwrap();
    /// assert!((baseline - 15.475 / 9.83).abs() < 1e-4);
    /// ```
    pub fn calibrate<S, D>(
        &self,
        sampler: &mut S,
        delay: &mut D,
        sample_count: u16,
        sample_interval_ms: u32,
    ) -> Result<f32, CalibrationError>
    where
        S: Sampler + ?Sized,
        D: Delay + ?Sized,
    {
        log_info!(
            "Calibrating: {} samples every {} ms",
            sample_count, sample_interval_ms
        );

        let window = sampling::collect(
            &self.model,
            sampler,
            delay,
            sample_count,
            sample_interval_ms,
            self.max_polls,
        );
        let mean = window
            .mean()
            .ok_or(CalibrationError::NoValidSamples { attempted: window.attempted })?;

        if !(self.clean_air_ratio > 0.0) {
            return Err(CalibrationError::InvalidCleanAirRatio { ratio: self.clean_air_ratio });
        }

        let baseline = mean / self.clean_air_ratio;
        if !(baseline > 0.0) {
            return Err(CalibrationError::NonPositiveBaseline { baseline });
        }

        log_info!(
            "Calibrated: Ro = {} kOhm from {}/{} samples (mean Rs {} kOhm)",
            baseline, window.valid, window.attempted, mean
        );

        Ok(baseline)
    }
}
