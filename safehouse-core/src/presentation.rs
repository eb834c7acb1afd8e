//! Four-line status board
//!
//! Composes the text shown on the 16x4 character display:
//!
//! ```text
//! Temp: 23 C
//! Humi: 40 %
//! Inside: 2
//! Status: OK
//! ```
//!
//! The fourth line holds the latest status message. Temporary messages
//! revert to "Status: OK" after a timeout. While the line reads
//! "Status: OK", live smoke and unoccupied-motion conditions are overlaid on
//! it, smoke first. The overlay never replaces the stored message.

use core::fmt::{self, Write};

use heapless::String;

use crate::constants::buffers::{DISPLAY_LINES, DISPLAY_LINE_WIDTH};
use crate::constants::time::STATUS_MESSAGE_TIMEOUT_MS;
use crate::reading::FusedReading;
use crate::time::Timestamp;

/// One display line
pub type DisplayLine = String<DISPLAY_LINE_WIDTH>;

/// A full screen
pub type DisplayLines = [DisplayLine; DISPLAY_LINES];

/// Status line shown until the first event
pub const STATUS_INIT: &str = "Status: Init...";
/// Status line after a temporary message expires
pub const STATUS_OK: &str = "Status: OK";
/// Bottom line while smoke is above threshold
pub const SMOKE_OVERLAY: &str = "SMOKE DETECTED!";
/// Bottom line while unattended motion is latched
pub const MOTION_OVERLAY: &str = "MOTION ALERT!";

/// Writes into a display line, dropping whatever does not fit
struct Truncating<'a>(&'a mut DisplayLine);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn line(args: fmt::Arguments<'_>) -> DisplayLine {
    let mut out = DisplayLine::new();
    // Truncating never reports an error
    let _ = Truncating(&mut out).write_fmt(args);
    out
}

/// Status line state plus screen composition
#[derive(Debug, Clone)]
pub struct StatusBoard {
    status: DisplayLine,
    clear_at: Option<Timestamp>,
    message_timeout_ms: u64,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(STATUS_MESSAGE_TIMEOUT_MS)
    }
}

impl StatusBoard {
    /// Board showing `STATUS_INIT`; temporary messages last `message_timeout_ms`
    pub fn new(message_timeout_ms: u64) -> Self {
        Self {
            status: line(format_args!("{}", STATUS_INIT)),
            clear_at: None,
            message_timeout_ms,
        }
    }

    /// Replace the status line
    ///
    /// A temporary message reverts after the timeout; a persistent one
    /// stays until replaced.
    pub fn post(&mut self, message: &str, temporary: bool, now: Timestamp) {
        self.status = line(format_args!("{}", message));
        self.clear_at = temporary.then(|| now.saturating_add(self.message_timeout_ms));
    }

    /// Expire a temporary message
    pub fn tick(&mut self, now: Timestamp) {
        if let Some(at) = self.clear_at {
            if now >= at {
                self.status = line(format_args!("{}", STATUS_OK));
                self.clear_at = None;
            }
        }
    }

    /// Stored status message, without overlays
    pub fn status(&self) -> &str {
        self.status.as_str()
    }

    /// Compose the four display lines
    pub fn compose(
        &mut self,
        reading: &FusedReading,
        occupancy: u16,
        smoke_threshold_ppm: f32,
        now: Timestamp,
    ) -> DisplayLines {
        self.tick(now);

        let (temp, humi) = match reading.climate() {
            Some(c) => (
                line(format_args!("Temp: {} C", c.temperature)),
                line(format_args!("Humi: {} %", c.humidity)),
            ),
            None => (line(format_args!("Temp: ERR")), line(format_args!("Humi: ERR"))),
        };

        let smoke = reading.smoke_ppm().map_or(false, |ppm| ppm >= smoke_threshold_ppm);
        let motion = occupancy == 0 && reading.motion;

        let status = if self.status.as_str() == STATUS_OK && smoke {
            line(format_args!("{}", SMOKE_OVERLAY))
        } else if self.status.as_str() == STATUS_OK && motion {
            line(format_args!("{}", MOTION_OVERLAY))
        } else {
            self.status.clone()
        };

        [temp, humi, line(format_args!("Inside: {}", occupancy)), status]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::DhtStatus;

    fn reading() -> FusedReading {
        FusedReading {
            temperature: 23,
            humidity: 40,
            dht_status: DhtStatus::Ok,
            gas_ppm: [1.0, 1.0, 20.0],
            motion: false,
        }
    }

    #[test]
    fn initial_screen() {
        let mut board = StatusBoard::default();
        let lines = board.compose(&reading(), 2, 500.0, 0);
        assert_eq!(lines[0].as_str(), "Temp: 23 C");
        assert_eq!(lines[1].as_str(), "Humi: 40 %");
        assert_eq!(lines[2].as_str(), "Inside: 2");
        assert_eq!(lines[3].as_str(), STATUS_INIT);
    }

    #[test]
    fn dht_error_lines() {
        let mut board = StatusBoard::default();
        let lines = board.compose(&FusedReading::unknown(), 0, 500.0, 0);
        assert_eq!(lines[0].as_str(), "Temp: ERR");
        assert_eq!(lines[1].as_str(), "Humi: ERR");
    }

    #[test]
    fn temporary_message_reverts() {
        let mut board = StatusBoard::new(5_000);
        board.post("Entry OK", true, 1_000);

        board.tick(5_999);
        assert_eq!(board.status(), "Entry OK");
        board.tick(6_000);
        assert_eq!(board.status(), STATUS_OK);
    }

    #[test]
    fn persistent_message_stays() {
        let mut board = StatusBoard::new(5_000);
        board.post("Entry OK", true, 0);
        board.post("ALERT: RFID", false, 100);
        board.tick(1_000_000);
        assert_eq!(board.status(), "ALERT: RFID");
    }

    #[test]
    fn overlays_only_on_ok_status() {
        let mut board = StatusBoard::new(10);
        board.post("WiFi OK", true, 0);

        let mut smoky = reading();
        smoky.gas_ppm[2] = 750.0;
        smoky.motion = true;

        // Not yet OK: no overlay
        assert_eq!(board.compose(&smoky, 0, 500.0, 5)[3].as_str(), "WiFi OK");

        // Smoke wins over motion
        assert_eq!(board.compose(&smoky, 0, 500.0, 10)[3].as_str(), SMOKE_OVERLAY);
        assert_eq!(board.status(), STATUS_OK);

        smoky.gas_ppm[2] = 10.0;
        assert_eq!(board.compose(&smoky, 0, 500.0, 20)[3].as_str(), MOTION_OVERLAY);
        assert_eq!(board.compose(&smoky, 1, 500.0, 30)[3].as_str(), STATUS_OK);
    }

    #[test]
    fn long_text_is_truncated() {
        let mut board = StatusBoard::default();
        board.post("A message far too long for one line", false, 0);
        assert_eq!(board.status().len(), DISPLAY_LINE_WIDTH);

        let mut hot = reading();
        hot.temperature = i32::MIN;
        assert_eq!(board.compose(&hot, 0, 500.0, 0)[0].len(), DISPLAY_LINE_WIDTH);
    }
}
