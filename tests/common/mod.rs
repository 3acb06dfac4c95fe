//! Shared fixtures for the integration suites: deterministic in-memory
//! collaborators wired into a real `AppContext` through the public API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;
use url::Url;
use uuid::Uuid;

use gateway::application::ports::account_repository::AccountRepository;
use gateway::application::ports::profile_repository::ProfileRepository;
use gateway::bootstrap::app_context::{AppContext, AppServices};
use gateway::bootstrap::config::Config;
use gateway::domain::accounts::{Account, AccountSnapshot, Acct};
use gateway::infrastructure::events::local::BroadcastStreamPublisher;
use gateway::infrastructure::identicon::FileBackedIdenticonRenderer;

pub fn test_config() -> Config {
    Config {
        port: 0,
        public_url: Url::parse("https://social.example").unwrap(),
        host: "social.example".into(),
        disable_hsts: false,
        database_url: "postgres://unused".into(),
        redis_url: None,
        cluster_mode: false,
        supervisor_socket: None,
        files_dir: "./files".into(),
        assets_dir: "./assets".into(),
        scratch_dir: None,
        proxy_max_bytes: 8 * 1024 * 1024,
        instance_name: "Lantern Test".into(),
    }
}

#[allow(dead_code)]
pub fn account(username: &str, avatar_url: Option<&str>) -> Account {
    Account {
        id: Uuid::new_v4(),
        username: username.into(),
        host: None,
        avatar_url: avatar_url.map(Into::into),
        is_suspended: false,
        created_at: chrono::Utc::now(),
    }
}

pub struct SeedAccounts {
    accounts: Vec<Account>,
}

#[async_trait]
impl AccountRepository for SeedAccounts {
    async fn find_by_acct(&self, acct: &Acct) -> anyhow::Result<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .find(|a| {
                a.username.eq_ignore_ascii_case(&acct.username)
                    && a.host.as_deref().map(|h| h.to_ascii_lowercase()) == acct.host
            })
            .cloned())
    }

    async fn count_local(&self) -> anyhow::Result<i64> {
        Ok(self
            .accounts
            .iter()
            .filter(|a| a.host.is_none() && !a.is_suspended)
            .count() as i64)
    }
}

/// At most one profile, with an optionally pending verification code.
pub struct SingleProfile {
    account_id: Uuid,
    state: Mutex<ProfileState>,
}

struct ProfileState {
    verify_code: Option<String>,
    email_verified: bool,
}

#[async_trait]
impl ProfileRepository for SingleProfile {
    async fn redeem_verify_code(&self, code: &str) -> anyhow::Result<Option<Uuid>> {
        let mut state = self.state.lock().unwrap();
        if state.verify_code.as_deref() == Some(code) {
            state.verify_code = None;
            state.email_verified = true;
            Ok(Some(self.account_id))
        } else {
            Ok(None)
        }
    }

    async fn snapshot(&self, account_id: Uuid) -> anyhow::Result<Option<AccountSnapshot>> {
        let state = self.state.lock().unwrap();
        if self.account_id != account_id {
            return Ok(None);
        }
        Ok(Some(AccountSnapshot {
            id: self.account_id,
            username: "alice".into(),
            host: None,
            avatar_url: None,
            email: Some("alice@example.com".into()),
            email_verified: state.email_verified,
        }))
    }
}

/// Builds a context around seeded accounts and, optionally, one profile
/// holding a pending verification code.
pub fn context_with_accounts(
    cfg: Config,
    accounts: Vec<Account>,
    pending: Option<(Uuid, &str)>,
) -> AppContext {
    let (account_id, verify_code) = match pending {
        Some((id, code)) => (id, Some(code.to_string())),
        None => (Uuid::new_v4(), None),
    };
    let profiles = SingleProfile {
        account_id,
        state: Mutex::new(ProfileState {
            verify_code,
            email_verified: false,
        }),
    };

    let (events_tx, _) = broadcast::channel(64);
    let services = AppServices::new(
        Arc::new(SeedAccounts { accounts }),
        Arc::new(profiles),
        Arc::new(FileBackedIdenticonRenderer::new(None)),
        events_tx.clone(),
        Arc::new(BroadcastStreamPublisher::new(events_tx)),
        None,
    );
    AppContext::new(cfg, services)
}
