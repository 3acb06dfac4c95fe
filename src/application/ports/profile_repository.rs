use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::accounts::AccountSnapshot;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Marks the profile holding `code` as verified and clears the code in a
    /// single atomic step. Returns the owning account id, or `None` when no
    /// profile holds the code. Under concurrent calls with the same code at
    /// most one caller may get `Some`.
    async fn redeem_verify_code(&self, code: &str) -> anyhow::Result<Option<Uuid>>;
    /// Owner-visible snapshot of the account and its profile.
    async fn snapshot(&self, account_id: Uuid) -> anyhow::Result<Option<AccountSnapshot>>;
}
