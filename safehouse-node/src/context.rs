//! Handles shared by every task

use std::sync::Arc;

use serde_json::Value;

use safehouse_connectors::payload::Message;
use safehouse_connectors::{Notifier, Topics};
use safehouse_core::motion::MotionSignal;
use safehouse_core::presentation::StatusBoard;
use safehouse_core::time::{TimeSource, Timestamp};

use crate::annunciator::Annunciator;
use crate::clock::TokioClock;
use crate::config::NodeConfig;
use crate::errors::NodeResult;
use crate::store::{NodeState, SharedSensorStore};

/// Clock shared between tasks
pub type SharedClock = Arc<dyn TimeSource + Send + Sync>;

/// Everything a task or callback needs, cheap to clone
#[derive(Clone)]
pub struct NodeContext {
    pub config: Arc<NodeConfig>,
    pub store: Arc<SharedSensorStore>,
    pub notifier: Arc<dyn Notifier>,
    pub topics: Arc<Topics>,
    pub annunciator: Arc<Annunciator>,
    pub clock: SharedClock,
    pub motion: Arc<MotionSignal>,
}

impl NodeContext {
    /// Build the shared state from a validated configuration
    ///
    /// The store starts with an unknown reading, the configured roster and
    /// an empty status board; the clock starts at zero now.
    pub fn new(
        config: NodeConfig,
        notifier: Arc<dyn Notifier>,
        annunciator: Annunciator,
    ) -> NodeResult<Self> {
        let access = config.access_engine()?;
        let board = StatusBoard::new(config.timing.status_message_timeout_ms);
        let topics = config.mqtt.topics();

        Ok(Self {
            store: Arc::new(SharedSensorStore::new(NodeState::new(access, board))),
            notifier,
            topics: Arc::new(topics),
            annunciator: Arc::new(annunciator),
            clock: Arc::new(TokioClock::new()),
            motion: Arc::new(MotionSignal::new()),
            config: Arc::new(config),
        })
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Fire-and-forget publish; failures are logged and dropped
    pub async fn publish(&self, topic: &str, payload: &Value) -> bool {
        match self.notifier.publish(topic, payload).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropped publish to {}: {}", topic, e);
                false
            }
        }
    }

    /// Publish a batch in order, returning how many went out
    pub async fn publish_all(&self, messages: &[Message]) -> usize {
        let mut sent = 0;
        for message in messages {
            if self.publish(&message.topic, &message.payload).await {
                sent += 1;
            }
        }
        sent
    }
}
