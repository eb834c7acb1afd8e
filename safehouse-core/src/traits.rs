//! Collaborator traits
//!
//! The core never touches peripherals directly. These traits are the seams
//! where a board support crate (or a test) plugs in the analog front end,
//! the delay provider and the climate sensor. Keep them small - embedded
//! drivers implement them in a few lines.

use crate::errors::SamplerError;
use crate::reading::DhtStatus;

/// Raw ADC reading. Physical values lie in `[0, ADC_MAX]`; anything at or
/// below zero is rejected by the resistance model.
pub type RawSample = i32;

/// Analog front end of the gas sensor
///
/// Follows the `nb` convention: a conversion still in progress returns
/// `nb::Error::WouldBlock` and the engine polls again.
///
/// ```rust
/// use safehouse_core::traits::{Sampler, RawSample};
/// use safehouse_core::errors::SamplerError;
///
/// struct Constant(RawSample);
///
/// impl Sampler for Constant {
///     fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
///         Ok(self.0)
///     }
/// }
/// ```
pub trait Sampler {
    /// Read one raw conversion
    fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError>;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
        (**self).read_raw()
    }
}

/// Blocking delay provider used to space samples
pub trait Delay {
    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Delay that returns immediately (simulation and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

/// Thread-sleeping delay (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// One temperature/humidity measurement in whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Climate {
    /// Air temperature (°C)
    pub temperature: i32,
    /// Relative humidity (%)
    pub humidity: i32,
}

/// Temperature/humidity sensor (DHT11 class)
///
/// Failures are reported as the DHT status the reading should carry
/// (`CrcError` or `Timeout`); returning `Err(DhtStatus::Ok)` is treated
/// as a timeout.
pub trait ClimateSensor {
    /// Read temperature and humidity
    fn read_climate(&mut self) -> Result<Climate, DhtStatus>;
}
