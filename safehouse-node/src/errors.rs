//! Node error types

use std::time::Duration;

use thiserror::Error;

use safehouse_connectors::ConnectorError;
use safehouse_core::errors::{AccessError, WireError};

/// The shared store lock could not be taken in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Store lock not acquired within {waited:?}")]
pub struct LockTimeout {
    /// How long the caller waited
    pub waited: Duration,
}

/// Errors raised by node tasks and configuration
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Configuration I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    LockTimeout(#[from] LockTimeout),

    #[error("Local sampler unavailable after a failed sampling job")]
    SamplerUnavailable,

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;
