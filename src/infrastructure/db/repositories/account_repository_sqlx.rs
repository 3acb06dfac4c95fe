use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::account_repository::AccountRepository;
use crate::domain::accounts::{Account, Acct};
use crate::infrastructure::db::PgPool;

pub struct SqlxAccountRepository {
    pub pool: PgPool,
}

impl SqlxAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: &sqlx::postgres::PgRow) -> Account {
    Account {
        id: row.get("id"),
        username: row.get("username"),
        host: row.get("host"),
        avatar_url: row.get("avatar_url"),
        is_suspended: row.get("is_suspended"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepository {
    async fn find_by_acct(&self, acct: &Acct) -> anyhow::Result<Option<Account>> {
        let row = match &acct.host {
            None => {
                sqlx::query(
                    r#"SELECT id, username, host, avatar_url, is_suspended, created_at
                       FROM accounts WHERE lower(username) = lower($1) AND host IS NULL"#,
                )
                .bind(&acct.username)
                .fetch_optional(&self.pool)
                .await?
            }
            Some(host) => {
                sqlx::query(
                    r#"SELECT id, username, host, avatar_url, is_suspended, created_at
                       FROM accounts WHERE lower(username) = lower($1) AND lower(host) = $2"#,
                )
                .bind(&acct.username)
                .bind(host)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        Ok(row.as_ref().map(row_to_account))
    }

    async fn count_local(&self) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM accounts WHERE host IS NULL AND is_suspended = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }
}
