use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::accounts::AccountSnapshot;

/// One message on an account's private update stream, in the shape clients
/// receive it: `{"type": "...", "body": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum StreamEvent {
    MeUpdated(AccountSnapshot),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountScopedEvent {
    pub account_id: Uuid,
    pub event: StreamEvent,
}

#[async_trait]
pub trait StreamPublisher: Send + Sync {
    async fn publish(&self, event: &AccountScopedEvent) -> anyhow::Result<()>;
}
