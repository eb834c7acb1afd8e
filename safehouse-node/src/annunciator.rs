//! Buzzer and LED actuation
//!
//! An alarm holds the buzzer on for its whole duration, optionally blinking
//! the LED at the configured interval, and leaves both off afterwards. A
//! blink phase never runs past the alarm deadline.
//! Alarms run to completion inside the calling task; concurrent alarms
//! queue behind each other on the pin lock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

/// One digital output
pub trait Indicator: Send {
    /// Drive the output high (`true`) or low
    fn set(&mut self, on: bool);
}

/// Indicator that records every level change
///
/// Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingIndicator {
    history: Arc<Mutex<Vec<(Instant, bool)>>>,
}

impl RecordingIndicator {
    /// Indicator with an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels set so far, oldest first
    pub fn levels(&self) -> Vec<bool> {
        self.lock().iter().map(|(_, on)| *on).collect()
    }

    /// Level changes with the instant they happened
    pub fn history(&self) -> Vec<(Instant, bool)> {
        self.lock().clone()
    }

    /// Last level set, off if never driven
    pub fn is_on(&self) -> bool {
        self.lock().last().map_or(false, |(_, on)| *on)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Instant, bool)>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Indicator for RecordingIndicator {
    fn set(&mut self, on: bool) {
        self.lock().push((Instant::now(), on));
    }
}

struct Pins {
    buzzer: Box<dyn Indicator>,
    led: Box<dyn Indicator>,
}

/// Timed buzzer and LED driver
pub struct Annunciator {
    pins: tokio::sync::Mutex<Pins>,
    blink_interval: Duration,
}

impl Annunciator {
    /// Driver for the given pins, blinking at `blink_interval` per cycle
    pub fn new(buzzer: Box<dyn Indicator>, led: Box<dyn Indicator>, blink_interval: Duration) -> Self {
        Self {
            pins: tokio::sync::Mutex::new(Pins { buzzer, led }),
            blink_interval,
        }
    }

    /// Sound the buzzer for `duration`, blinking the LED if `blink` is set
    pub async fn alarm(&self, duration: Duration, blink: bool) {
        let mut pins = self.pins.lock().await;
        log::warn!("Activating buzzer for {} ms", duration.as_millis());

        pins.buzzer.set(true);
        if blink {
            let half = (self.blink_interval / 2).max(Duration::from_millis(1));
            let deadline = Instant::now() + duration;
            while Instant::now() < deadline {
                pins.led.set(true);
                tokio::time::sleep_until((Instant::now() + half).min(deadline)).await;
                if Instant::now() >= deadline {
                    break;
                }
                pins.led.set(false);
                tokio::time::sleep_until((Instant::now() + half).min(deadline)).await;
            }
        } else {
            tokio::time::sleep(duration).await;
        }

        pins.buzzer.set(false);
        pins.led.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annunciator() -> (Annunciator, RecordingIndicator, RecordingIndicator) {
        let buzzer = RecordingIndicator::new();
        let led = RecordingIndicator::new();
        let a = Annunciator::new(
            Box::new(buzzer.clone()),
            Box::new(led.clone()),
            Duration::from_millis(250),
        );
        (a, buzzer, led)
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_without_led() {
        let (a, buzzer, led) = annunciator();
        let start = Instant::now();

        a.alarm(Duration::from_millis(1000), false).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000) && elapsed < Duration::from_millis(1010));
        assert_eq!(buzzer.levels(), vec![true, false]);
        assert_eq!(led.levels(), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn blinks_for_the_whole_duration() {
        let (a, buzzer, led) = annunciator();

        a.alarm(Duration::from_millis(1000), true).await;

        let levels = led.levels();
        let on_pulses = levels.iter().filter(|on| **on).count();
        assert_eq!(on_pulses, 4);
        assert!(!led.is_on());
        assert!(!buzzer.is_on());
    }

    #[tokio::test(start_paused = true)]
    async fn blinking_stops_at_the_deadline() {
        let buzzer = RecordingIndicator::new();
        let led = RecordingIndicator::new();
        let a = Annunciator::new(
            Box::new(buzzer.clone()),
            Box::new(led.clone()),
            Duration::from_millis(300),
        );
        let start = Instant::now();

        a.alarm(Duration::from_millis(1000), true).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000) && elapsed < Duration::from_millis(1010));
        assert_eq!(led.levels().iter().filter(|on| **on).count(), 4);
        assert!(!led.is_on());

        let history = buzzer.history();
        let sounded = history[1].0 - history[0].0;
        assert!(sounded < Duration::from_millis(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_alarms_serialize() {
        let (a, buzzer, _led) = annunciator();
        let a = Arc::new(a);
        let start = Instant::now();

        let first = tokio::spawn({
            let a = Arc::clone(&a);
            async move { a.alarm(Duration::from_millis(300), false).await }
        });
        let second = tokio::spawn({
            let a = Arc::clone(&a);
            async move { a.alarm(Duration::from_millis(300), false).await }
        });
        first.await.unwrap();
        second.await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(600));
        assert_eq!(buzzer.levels(), vec![true, false, true, false]);
    }
}
