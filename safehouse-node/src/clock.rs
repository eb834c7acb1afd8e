//! Runtime clock
//!
//! Milliseconds since the node started, read from the tokio clock so that
//! paused-time tests drive the status board and the concentration cache
//! along with every sleep and interval.

use safehouse_core::time::{TimeSource, Timestamp};
use tokio::time::Instant;

/// `TimeSource` backed by `tokio::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    start: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for TokioClock {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn follows_paused_time() {
        let clock = TokioClock::new();
        assert_eq!(clock.now(), 0);

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(clock.now(), 1500);
    }
}
