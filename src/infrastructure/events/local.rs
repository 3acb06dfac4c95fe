use async_trait::async_trait;

use crate::application::ports::stream_publisher::{AccountScopedEvent, StreamPublisher};

/// Single-process event bus: publishes straight onto the in-process
/// broadcast channel that stream subscribers listen on.
#[derive(Clone)]
pub struct BroadcastStreamPublisher {
    sender: tokio::sync::broadcast::Sender<AccountScopedEvent>,
}

impl BroadcastStreamPublisher {
    pub fn new(sender: tokio::sync::broadcast::Sender<AccountScopedEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl StreamPublisher for BroadcastStreamPublisher {
    async fn publish(&self, event: &AccountScopedEvent) -> anyhow::Result<()> {
        match self.sender.send(event.clone()) {
            Ok(_) => Ok(()),
            // No active subscribers is harmless; don't propagate a 500 back to the caller.
            Err(tokio::sync::broadcast::error::SendError(_)) => Ok(()),
        }
    }
}
