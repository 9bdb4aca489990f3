//! Log-based publisher adapter.
//!
//! Implements [`Publisher`] by writing each state notification to the log.
//! Stands in for the broker connection on a host; an MQTT adapter would
//! implement the same trait and be swapped in at wiring time.

use log::info;

use crate::app::ports::{PublishError, Publisher};

/// Adapter that logs every state notification.
#[derive(Debug, Default)]
pub struct LogPublisher {
    sent: u64,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Publisher for LogPublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if topic.is_empty() {
            return Err(PublishError::Rejected);
        }
        self.sent += 1;
        info!(target: "pubsub", "PUB | {} | {}", topic, payload);
        Ok(())
    }
}
