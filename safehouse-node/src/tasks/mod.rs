//! Node tasks and callbacks
//!
//! - [`receive`]: frames from the remote sensing node
//! - [`access`]: identity scans
//! - [`alerts`]: periodic alert evaluation and actuation
//! - [`presentation`]: periodic display refresh
//! - [`sampler`]: locally attached sensors
//! - [`link`]: broker connect and disconnect announcements

pub mod access;
pub mod alerts;
pub mod link;
pub mod presentation;
pub mod receive;
pub mod sampler;

pub use access::on_identity_scanned;
pub use alerts::run_alert_cycle;
pub use presentation::{run_presentation_cycle, Display, LogDisplay, MemoryDisplay};
pub use receive::on_remote_payload;
pub use sampler::LocalSampler;
