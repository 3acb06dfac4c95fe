use async_trait::async_trait;

use crate::domain::accounts::{Account, Acct};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Looks up an account by address. A local acct (no host) only matches
    /// accounts registered on this instance.
    async fn find_by_acct(&self, acct: &Acct) -> anyhow::Result<Option<Account>>;
    /// Number of non-suspended accounts registered on this instance.
    async fn count_local(&self) -> anyhow::Result<i64>;
}
