//! Core engines for the SafeHouse warehouse node
//!
//! Turns raw gas sensor readings into calibrated concentrations, tracks who
//! is inside, and decides when the environment warrants an alert.
//! Designed to run on the node's microcontroller as well as on a host.
//!
//! Key constraints:
//! - `no_std` capable, no heap allocation
//! - Peripherals only through the traits in [`traits`]
//! - Every failure is a typed, `Copy` error; nothing here panics on bad
//!   sensor data
//!
//! ```no_run
//! use safehouse_core::gas::{GasConcentrationEngine, GasSensorConfig};
//! use safehouse_core::time::MonotonicTime;
//! use safehouse_core::traits::{RawSample, Sampler, StdDelay};
//! use safehouse_core::errors::SamplerError;
//!
//! struct Adc;
//! impl Sampler for Adc {
//!     fn read_raw(&mut self) -> nb::Result<RawSample, SamplerError> {
//!         Ok(1200)
//!     }
//! }
//!
//! let mut engine = GasConcentrationEngine::new(Adc, StdDelay, MonotonicTime::new(), GasSensorConfig::default());
//! engine.begin().expect("clean air");
//! let ppm = engine.read_all().map(|c| c.to_ppm_array());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod access;
pub mod alerts;
pub mod constants;
pub mod errors;
pub mod gas;
pub mod motion;
pub mod presentation;
pub mod reading;
pub mod time;
pub mod traits;

// Public API
pub use access::{AccessControlEngine, Identity, ScanOutcome};
pub use alerts::{AlertEvaluator, AlertKind, AlertThresholds};
pub use errors::{
    AccessError, CalibrationError, GasError, GasResult, PpmError, ReadError, WireError,
};
pub use gas::{GasChannel, GasConcentrationEngine, GasSensorConfig};
pub use motion::MotionSignal;
pub use presentation::StatusBoard;
pub use reading::{DhtStatus, FusedReading};
pub use time::{TimeSource, Timestamp};
pub use traits::{ClimateSensor, Delay, Sampler};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
