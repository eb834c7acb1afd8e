//! Fused sensor reading and its wire frame
//!
//! A `FusedReading` is the latest view of every sensing subsystem. Each
//! subsystem's fields are either fully valid or hold that subsystem's
//! sentinel: climate values are `CLIMATE_SENTINEL` whenever the DHT status
//! is not OK, and a gas channel is NaN when its concentration is unknown.
//!
//! ## Wire frame
//!
//! The sensing node ships readings as a fixed 28-byte little-endian frame:
//!
//! | Offset | Size | Field                  |
//! |--------|------|------------------------|
//! | 0      | 4    | temperature (i32, °C)  |
//! | 4      | 4    | humidity (i32, %)      |
//! | 8      | 4    | DHT status (i32)       |
//! | 12     | 4    | LPG ppm (f32)          |
//! | 16     | 4    | CO ppm (f32)           |
//! | 20     | 4    | smoke ppm (f32)        |
//! | 24     | 1    | motion (u8, 0 or 1)    |
//! | 25     | 3    | padding                |

use crate::constants::alerts::CLIMATE_SENTINEL;
use crate::errors::WireError;
use crate::gas::GasChannel;
use crate::traits::Climate;

/// Size of an encoded reading
pub const FUSED_READING_WIRE_LEN: usize = 28;

/// Temperature/humidity sensor status, with the driver's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum DhtStatus {
    /// Valid reading
    Ok = 0,
    /// Checksum mismatch
    CrcError = -1,
    /// Sensor did not answer
    Timeout = -2,
}

impl DhtStatus {
    /// Driver status code
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Status for a driver code
    pub const fn from_code(code: i32) -> Result<Self, WireError> {
        match code {
            0 => Ok(Self::Ok),
            -1 => Ok(Self::CrcError),
            -2 => Ok(Self::Timeout),
            _ => Err(WireError::DhtStatus { code }),
        }
    }

    /// Whether the climate fields hold real values
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Latest reading from every sensing subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusedReading {
    /// °C, or `CLIMATE_SENTINEL`
    pub temperature: i32,
    /// %RH, or `CLIMATE_SENTINEL`
    pub humidity: i32,
    /// Climate sensor status for this reading
    pub dht_status: DhtStatus,
    /// ppm indexed by `GasChannel::index`, NaN when unknown
    pub gas_ppm: [f32; 3],
    /// Motion detected since the previous reading
    pub motion: bool,
}

impl Default for FusedReading {
    fn default() -> Self {
        Self::unknown()
    }
}

impl FusedReading {
    /// Nothing known yet: climate sentinels, DHT timeout, NaN gas, no motion
    pub const fn unknown() -> Self {
        Self {
            temperature: CLIMATE_SENTINEL,
            humidity: CLIMATE_SENTINEL,
            dht_status: DhtStatus::Timeout,
            gas_ppm: [f32::NAN; 3],
            motion: false,
        }
    }

    /// Fill the climate fields from a sensor result
    pub fn set_climate(&mut self, result: Result<Climate, DhtStatus>) {
        match result {
            Ok(climate) => {
                self.temperature = climate.temperature;
                self.humidity = climate.humidity;
                self.dht_status = DhtStatus::Ok;
            }
            Err(status) => {
                self.temperature = CLIMATE_SENTINEL;
                self.humidity = CLIMATE_SENTINEL;
                self.dht_status = if status.is_ok() { DhtStatus::Timeout } else { status };
            }
        }
    }

    /// Climate values, only when the DHT status is OK
    pub fn climate(&self) -> Option<Climate> {
        self.dht_status.is_ok().then_some(Climate {
            temperature: self.temperature,
            humidity: self.humidity,
        })
    }

    /// Concentration on one channel, `None` when unknown
    pub fn gas(&self, channel: GasChannel) -> Option<f32> {
        let value = self.gas_ppm[channel.index()];
        (value.is_finite() && value >= 0.0).then_some(value)
    }

    /// Smoke concentration, `None` when unknown
    pub fn smoke_ppm(&self) -> Option<f32> {
        self.gas(GasChannel::Smoke)
    }

    /// Force every field back to either valid data or its sentinel
    pub fn sanitize(&mut self) {
        if !self.dht_status.is_ok() {
            self.temperature = CLIMATE_SENTINEL;
            self.humidity = CLIMATE_SENTINEL;
        }
        for value in self.gas_ppm.iter_mut() {
            if !(value.is_finite() && *value >= 0.0) {
                *value = f32::NAN;
            }
        }
    }

    /// Encode as a wire frame
    pub fn to_bytes(&self) -> [u8; FUSED_READING_WIRE_LEN] {
        let mut frame = [0u8; FUSED_READING_WIRE_LEN];
        frame[0..4].copy_from_slice(&self.temperature.to_le_bytes());
        frame[4..8].copy_from_slice(&self.humidity.to_le_bytes());
        frame[8..12].copy_from_slice(&self.dht_status.code().to_le_bytes());
        for (i, value) in self.gas_ppm.iter().enumerate() {
            let at = 12 + i * 4;
            frame[at..at + 4].copy_from_slice(&value.to_le_bytes());
        }
        frame[24] = u8::from(self.motion);
        frame
    }

    /// Decode a wire frame
    ///
    /// The decoded reading is sanitized, so a sender that leaves stale
    /// climate values next to a failed DHT status cannot break the
    /// valid-or-sentinel rule.
    pub fn from_bytes(frame: &[u8]) -> Result<Self, WireError> {
        if frame.len() != FUSED_READING_WIRE_LEN {
            return Err(WireError::Length {
                expected: FUSED_READING_WIRE_LEN,
                actual: frame.len(),
            });
        }

        let word = |at: usize| [frame[at], frame[at + 1], frame[at + 2], frame[at + 3]];

        let mut reading = Self {
            temperature: i32::from_le_bytes(word(0)),
            humidity: i32::from_le_bytes(word(4)),
            dht_status: DhtStatus::from_code(i32::from_le_bytes(word(8)))?,
            gas_ppm: [
                f32::from_le_bytes(word(12)),
                f32::from_le_bytes(word(16)),
                f32::from_le_bytes(word(20)),
            ],
            motion: frame[24] != 0,
        };
        reading.sanitize();
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FusedReading {
        FusedReading {
            temperature: 24,
            humidity: 41,
            dht_status: DhtStatus::Ok,
            gas_ppm: [12.5, 3.25, 180.0],
            motion: true,
        }
    }

    #[test]
    fn frame_layout() {
        let frame = sample().to_bytes();
        assert_eq!(&frame[0..4], &24i32.to_le_bytes());
        assert_eq!(&frame[8..12], &0i32.to_le_bytes());
        assert_eq!(&frame[20..24], &180.0f32.to_le_bytes());
        assert_eq!(frame[24], 1);
        assert_eq!(&frame[25..], &[0, 0, 0]);
    }

    #[test]
    fn decode_matches_encoded_reading() {
        let decoded = FusedReading::from_bytes(&sample().to_bytes()).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn wrong_length_rejected() {
        let frame = sample().to_bytes();
        assert_eq!(
            FusedReading::from_bytes(&frame[..27]),
            Err(WireError::Length { expected: 28, actual: 27 })
        );
        assert!(FusedReading::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn failed_dht_forces_sentinels() {
        let mut reading = sample();
        reading.dht_status = DhtStatus::CrcError;
        let decoded = FusedReading::from_bytes(&reading.to_bytes()).unwrap();

        assert_eq!(decoded.temperature, CLIMATE_SENTINEL);
        assert_eq!(decoded.humidity, CLIMATE_SENTINEL);
        assert_eq!(decoded.climate(), None);
    }

    #[test]
    fn unknown_status_code_rejected() {
        let mut frame = sample().to_bytes();
        frame[8..12].copy_from_slice(&(-7i32).to_le_bytes());
        assert_eq!(FusedReading::from_bytes(&frame), Err(WireError::DhtStatus { code: -7 }));
    }

    #[test]
    fn negative_gas_becomes_unknown() {
        let mut reading = sample();
        reading.gas_ppm[GasChannel::Co.index()] = -1.0;
        let decoded = FusedReading::from_bytes(&reading.to_bytes()).unwrap();

        assert!(decoded.gas_ppm[GasChannel::Co.index()].is_nan());
        assert_eq!(decoded.gas(GasChannel::Co), None);
        assert_eq!(decoded.smoke_ppm(), Some(180.0));
    }

    #[test]
    fn climate_failure_never_mixes() {
        let mut reading = sample();
        reading.set_climate(Err(DhtStatus::Timeout));
        assert_eq!(reading.temperature, CLIMATE_SENTINEL);
        assert_eq!(reading.dht_status, DhtStatus::Timeout);

        reading.set_climate(Err(DhtStatus::Ok));
        assert_eq!(reading.dht_status, DhtStatus::Timeout);

        reading.set_climate(Ok(Climate { temperature: 30, humidity: 50 }));
        assert_eq!(reading.climate(), Some(Climate { temperature: 30, humidity: 50 }));
    }

    #[test]
    fn starts_unknown() {
        let reading = FusedReading::default();
        assert_eq!(reading.dht_status, DhtStatus::Timeout);
        assert!(reading.gas_ppm.iter().all(|v| v.is_nan()));
        assert!(!reading.motion);
    }
}
