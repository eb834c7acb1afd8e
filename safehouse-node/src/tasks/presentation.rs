//! Periodic presentation task
//!
//! Composes the four display lines under the store lock and renders them
//! after releasing it.

use std::sync::{Arc, Mutex};

use tokio::time::MissedTickBehavior;

use safehouse_core::presentation::DisplayLines;

use crate::context::NodeContext;
use crate::errors::NodeResult;

/// Four-line text display
pub trait Display: Send {
    fn render(&mut self, lines: &DisplayLines);
}

/// Display that writes each frame to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl Display for LogDisplay {
    fn render(&mut self, lines: &DisplayLines) {
        log::debug!("[{}] [{}] [{}] [{}]", lines[0], lines[1], lines[2], lines[3]);
    }
}

/// Display that keeps every rendered frame; clones share the frames
#[derive(Debug, Default, Clone)]
pub struct MemoryDisplay {
    frames: Arc<Mutex<Vec<DisplayLines>>>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<DisplayLines> {
        self.lock().clone()
    }

    /// Most recent frame as plain strings
    pub fn last(&self) -> Option<[String; 4]> {
        self.lock()
            .last()
            .map(|lines| lines.clone().map(|line| line.as_str().to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DisplayLines>> {
        self.frames.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Display for MemoryDisplay {
    fn render(&mut self, lines: &DisplayLines) {
        self.lock().push(lines.clone());
    }
}

/// Compose and render one frame
///
/// On lock timeout nothing is rendered and the previous frame stays up.
pub async fn run_presentation_cycle(ctx: &NodeContext, display: &mut dyn Display) -> NodeResult<DisplayLines> {
    let smoke_threshold = ctx.config.alerts.smoke_ppm;
    let now = ctx.now();

    let lines = ctx
        .store
        .with_lock(ctx.config.timing.lock_timeout(), |state| {
            let occupancy = state.access.occupancy();
            state.board.compose(&state.reading, occupancy, smoke_threshold, now)
        })
        .await
        .map_err(|e| {
            log::warn!("Display update skipped: {}", e);
            e
        })?;

    display.render(&lines);
    Ok(lines)
}

/// Refresh forever at the configured presentation period
pub async fn run(ctx: NodeContext, mut display: Box<dyn Display>) {
    let mut ticker = tokio::time::interval(ctx.config.timing.presentation_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let _ = run_presentation_cycle(&ctx, display.as_mut()).await;
    }
}
