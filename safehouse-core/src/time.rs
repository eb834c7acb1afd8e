//! Time management for the node
//!
//! Provides a clock abstraction for the concentration cache and the status
//! board:
//! - Monotonic clock since boot (std)
//! - Fixed, manually advanced clock (tests, simulation)

use core::sync::atomic::{AtomicU64, Ordering};

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Source of monotonic time
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(feature = "std")]
impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Monotonic clock anchored at construction (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Clock starting at zero now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Manually advanced clock
///
/// Interior mutability lets a test hold `&FixedTime` in an engine and still
/// advance it from outside.
#[derive(Debug, Default)]
pub struct FixedTime {
    timestamp: AtomicU64,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub const fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: AtomicU64::new(timestamp) }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.store(timestamp, Ordering::Relaxed);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.fetch_add(ms, Ordering::Relaxed);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.load(Ordering::Relaxed)
    }
}

/// Milliseconds elapsed from `earlier` to `later`, zero if the clock
/// went backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!((&time).now(), 10);
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(elapsed_ms(100, 250), 150);
        assert_eq!(elapsed_ms(250, 100), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_does_not_go_backwards() {
        let clock = MonotonicTime::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
