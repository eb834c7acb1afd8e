//! # SafeHouse Node
//!
//! Concurrent runtime for the warehouse node: one shared store, the
//! periodic tasks that read it and the callbacks that write it.
//!
//! ## Tasks
//!
//! | Task | Trigger | Lock timeout |
//! |------|---------|--------------|
//! | local sampler | sampling period | `lock_timeout_ms` |
//! | remote receive | transport frame | `receive_lock_timeout_ms` |
//! | identity scan | scanner event | `lock_timeout_ms` |
//! | alerts | alert period | `lock_timeout_ms`, motion reset `receive_lock_timeout_ms` |
//! | presentation | presentation period | `lock_timeout_ms` |
//!
//! Every access to shared state goes through
//! [`SharedSensorStore::with_lock`] with a bounded wait. A task that times
//! out skips its cycle and the store counts it as degraded; nothing blocks
//! indefinitely and no task holds the lock across an await point.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use safehouse_connectors::MemoryNotifier;
//! use safehouse_node::annunciator::{Annunciator, RecordingIndicator};
//! use safehouse_node::tasks::{on_identity_scanned, LogDisplay};
//! use safehouse_node::{spawn_periodic, NodeConfig, NodeContext};
//!
//! # async fn example() -> safehouse_node::NodeResult<()> {
//! let config = NodeConfig::from_json_str(r#"{ "access": { "roster": ["04 A3 2B 1C"] } }"#)?;
//! let annunciator = Annunciator::new(
//!     Box::new(RecordingIndicator::new()),
//!     Box::new(RecordingIndicator::new()),
//!     config.actuation.led_blink_interval(),
//! );
//! let ctx = NodeContext::new(config, Arc::new(MemoryNotifier::new()), annunciator)?;
//! let tasks = spawn_periodic(&ctx, Box::new(LogDisplay));
//!
//! on_identity_scanned(&ctx, "04 A3 2B 1C").await?;
//! tokio::time::sleep(Duration::from_secs(1)).await;
//! tasks.abort();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod annunciator;
pub mod clock;
pub mod config;
pub mod context;
pub mod errors;
pub mod store;
pub mod tasks;

pub use annunciator::{Annunciator, Indicator, RecordingIndicator};
pub use clock::TokioClock;
pub use config::{AccessConfig, ActuationConfig, NodeConfig, TimingConfig};
pub use context::NodeContext;
pub use errors::{LockTimeout, NodeError, NodeResult};
pub use store::{NodeState, SharedSensorStore};

use tokio::task::JoinHandle;

use safehouse_core::time::TimeSource;
use safehouse_core::traits::{Delay, Sampler};

use crate::tasks::presentation::Display;
use crate::tasks::sampler::LocalSampler;

/// Handles of spawned background tasks
#[derive(Debug, Default)]
pub struct NodeTasks {
    handles: Vec<JoinHandle<()>>,
}

impl NodeTasks {
    /// Add the local sampling task
    pub fn spawn_sampler<S, D, C>(&mut self, ctx: &NodeContext, sampler: LocalSampler<S, D, C>)
    where
        S: Sampler + Send + 'static,
        D: Delay + Send + 'static,
        C: TimeSource + Send + 'static,
    {
        self.handles.push(tokio::spawn(sampler.run(ctx.clone())));
    }

    /// Add the broker link watcher
    pub fn spawn_link_watch(&mut self, ctx: &NodeContext, link: tokio::sync::watch::Receiver<bool>) {
        self.handles.push(tokio::spawn(tasks::link::watch_link(ctx.clone(), link)));
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Stop every task
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Spawn the alert and presentation loops
pub fn spawn_periodic(ctx: &NodeContext, display: Box<dyn Display>) -> NodeTasks {
    log::info!(
        "Starting alert task ({} ms) and presentation task ({} ms)",
        ctx.config.timing.alert_period_ms,
        ctx.config.timing.presentation_period_ms
    );
    NodeTasks {
        handles: vec![
            tokio::spawn(tasks::alerts::run(ctx.clone())),
            tokio::spawn(tasks::presentation::run(ctx.clone(), display)),
        ],
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
