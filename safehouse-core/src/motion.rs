//! Single-slot motion signal
//!
//! The motion interrupt posts, the sampler drains. At most one detection is
//! pending at a time; pulses arriving while one is pending are absorbed into
//! it. Both operations are lock-free and safe to call from an interrupt
//! context.

use core::sync::atomic::{AtomicBool, Ordering};

/// Pending-motion flag shared between an interrupt and a consumer
#[derive(Debug, Default)]
pub struct MotionSignal {
    pending: AtomicBool,
}

impl MotionSignal {
    /// No detection pending
    pub const fn new() -> Self {
        Self { pending: AtomicBool::new(false) }
    }

    /// Record a detection. Returns `false` if one was already pending.
    pub fn post(&self) -> bool {
        !self.pending.swap(true, Ordering::AcqRel)
    }

    /// Drain the pending detection, if any
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Whether a detection awaits `take`, without draining it
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_observed_once() {
        let signal = MotionSignal::new();
        assert!(!signal.take());

        assert!(signal.post());
        assert!(signal.is_pending());
        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn pulses_coalesce_while_pending() {
        let signal = MotionSignal::new();
        assert!(signal.post());
        assert!(!signal.post());
        assert!(!signal.post());

        assert!(signal.take());
        assert!(!signal.is_pending());
    }

    #[cfg(feature = "std")]
    #[test]
    fn posts_from_another_thread() {
        use std::sync::Arc;

        let signal = Arc::new(MotionSignal::new());
        let producer = Arc::clone(&signal);
        std::thread::spawn(move || {
            producer.post();
        })
        .join()
        .unwrap();

        assert!(signal.take());
    }
}
