use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::profile_repository::ProfileRepository;
use crate::domain::accounts::AccountSnapshot;
use crate::infrastructure::db::PgPool;

pub struct SqlxProfileRepository {
    pub pool: PgPool,
}

impl SqlxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn redeem_verify_code(&self, code: &str) -> anyhow::Result<Option<Uuid>> {
        // Single conditional UPDATE so concurrent redeems of the same code
        // cannot both match: the row predicate fails once the code is cleared.
        let row = sqlx::query(
            r#"UPDATE account_profiles
               SET email_verified = TRUE, email_verify_code = NULL, updated_at = now()
               WHERE email_verify_code = $1
               RETURNING account_id"#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.get("account_id")))
    }

    async fn snapshot(&self, account_id: Uuid) -> anyhow::Result<Option<AccountSnapshot>> {
        let row = sqlx::query(
            r#"SELECT a.id, a.username, a.host, a.avatar_url, p.email, p.email_verified
               FROM accounts a
               JOIN account_profiles p ON p.account_id = a.id
               WHERE a.id = $1"#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| AccountSnapshot {
            id: r.get("id"),
            username: r.get("username"),
            host: r.get("host"),
            avatar_url: r.get("avatar_url"),
            email: r.get("email"),
            email_verified: r.get("email_verified"),
        }))
    }
}
