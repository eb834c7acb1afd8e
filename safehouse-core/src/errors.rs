//! Error Types for Gas Estimation and Access Control
//!
//! ## Design Philosophy
//!
//! The error types follow the same rules everywhere in the core:
//!
//! 1. **Small Size**: variants carry at most a couple of scalars, so errors
//!    can be returned from sampling loops and stored in caches cheaply.
//!
//! 2. **No Heap Allocation**: no `String`, only inline scalars and
//!    `&'static str`.
//!
//! 3. **Copy Semantics**: every error is `Copy`.
//!
//! 4. **Diagnostic Context**: each variant carries the raw value or the
//!    intermediate that caused it, so a log line is enough to diagnose.
//!
//! ## Error Categories
//!
//! | Category    | Type               | Raised by                          |
//! |-------------|--------------------|------------------------------------|
//! | Acquisition | `AcquisitionError` | resistance model, raw input <= 0   |
//! | Sampling    | `SamplerError`     | analog front end                   |
//! | Calibration | `CalibrationError` | clean-air calibration              |
//! | Reading     | `ReadError`        | routine resistance reads           |
//! | Computation | `PpmError`         | curve evaluation                   |
//! | Access      | `AccessError`      | roster and identity handling       |
//! | Wire        | `WireError`        | fused reading frame decoding       |
//!
//! `GasError` wraps the gas-side categories for callers that only need to
//! know that a channel is unavailable this cycle.
//!
//! ## Handling Strategy
//!
//! None of these errors is fatal. The caller substitutes the channel's
//! "unknown" marker (NaN for gas, the climate sentinel for DHT values) and
//! the rest of the node keeps running:
//!
//! ```rust
//! use safehouse_core::{GasError, ReadError};
//!
//! fn smoke_or_unknown(result: Result<f32, GasError>) -> f32 {
//!     match result {
//!         Ok(ppm) => ppm,
//!         Err(GasError::Read(ReadError::NotCalibrated)) => f32::NAN,
//!         Err(_) => f32::NAN,
//!     }
//! }
//! # assert!(smoke_or_unknown(Err(GasError::Read(ReadError::NotCalibrated))).is_nan());
//! ```

use thiserror_no_std::Error;

/// Result type for gas engine operations
pub type GasResult<T> = Result<T, GasError>;

/// Raw input that cannot correspond to a physical resistance
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AcquisitionError {
    /// Raw reading at or below zero
    #[error("Non-physical raw reading {raw}")]
    NonPhysicalRaw {
        /// The rejected raw ADC value
        raw: i32,
    },
}

/// Analog front end failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    /// Conversion did not complete
    #[error("ADC conversion timed out")]
    Timeout,

    /// Peripheral reported a fault
    #[error("ADC fault: {reason}")]
    Hardware {
        /// Short description from the driver
        reason: &'static str,
    },
}

/// Clean-air calibration failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Every calibration sample was rejected
    #[error("No valid samples out of {attempted}")]
    NoValidSamples {
        /// Number of samples taken
        attempted: u16,
    },

    /// Clean-air ratio is zero, negative or NaN
    #[error("Invalid clean-air ratio {ratio}")]
    InvalidCleanAirRatio {
        /// The configured ratio
        ratio: f32,
    },

    /// Averaged baseline came out non-positive (saturated divider)
    #[error("Non-positive baseline {baseline} kOhm")]
    NonPositiveBaseline {
        /// The computed baseline
        baseline: f32,
    },

    /// Baseline already set; deinit before calibrating again
    #[error("Sensor already calibrated")]
    AlreadyCalibrated,
}

/// Routine resistance read failures
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ReadError {
    /// Baseline is unset; concentration reads are refused
    #[error("Sensor not calibrated")]
    NotCalibrated,

    /// Every sample in the read window was rejected
    #[error("No valid samples out of {attempted}")]
    NoValidSamples {
        /// Number of samples taken
        attempted: u16,
    },
}

/// Curve evaluation failures, checked in declaration order
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PpmError {
    /// No curve supplied for the channel
    #[error("Missing concentration curve")]
    MissingCurve,

    /// Slope magnitude below 1e-9
    #[error("Degenerate curve slope {slope}")]
    DegenerateSlope {
        /// The rejected slope
        slope: f32,
    },

    /// Rs/Ro ratio at or below zero
    #[error("Non-positive resistance ratio {ratio}")]
    NonPositiveRatio {
        /// The rejected ratio
        ratio: f32,
    },

    /// Result is infinite or NaN
    #[error("Concentration overflow at ratio {ratio}")]
    NumericOverflow {
        /// Ratio that produced the overflow
        ratio: f32,
    },
}

/// Any failure on the gas path
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GasError {
    /// Resistance could not be read
    #[error("Read failed: {0}")]
    Read(#[from] ReadError),

    /// Concentration could not be computed
    #[error("Concentration failed: {0}")]
    Ppm(#[from] PpmError),
}

/// Roster and identity failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// Identity string is empty after trimming
    #[error("Empty identity")]
    EmptyIdentity,

    /// Identity longer than the fixed capacity
    #[error("Identity length {len} exceeds {max}")]
    IdentityTooLong {
        /// Length of the offending identity
        len: usize,
        /// Capacity
        max: usize,
    },

    /// Roster is at capacity
    #[error("Roster full ({capacity} entries)")]
    RosterFull {
        /// Roster capacity
        capacity: usize,
    },

    /// Identity already present in the roster
    #[error("Duplicate roster identity")]
    DuplicateIdentity,
}

/// Fused reading frame decoding failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Frame length differs from the fixed frame size
    #[error("Frame length {actual}, expected {expected}")]
    Length {
        /// Expected frame length
        expected: usize,
        /// Received frame length
        actual: usize,
    },

    /// Unknown DHT status code
    #[error("Unknown DHT status code {code}")]
    DhtStatus {
        /// The unrecognized code
        code: i32,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for PpmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MissingCurve =>
                defmt::write!(fmt, "Missing curve"),
            Self::DegenerateSlope { slope } =>
                defmt::write!(fmt, "Degenerate slope {}", slope),
            Self::NonPositiveRatio { ratio } =>
                defmt::write!(fmt, "Non-positive ratio {}", ratio),
            Self::NumericOverflow { ratio } =>
                defmt::write!(fmt, "Overflow at ratio {}", ratio),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for GasError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Read(ReadError::NotCalibrated) =>
                defmt::write!(fmt, "Not calibrated"),
            Self::Read(ReadError::NoValidSamples { attempted }) =>
                defmt::write!(fmt, "No valid samples of {}", attempted),
            Self::Ppm(e) => defmt::write!(fmt, "{}", e),
        }
    }
}
