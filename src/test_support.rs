//! In-memory service doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;
use url::Url;
use uuid::Uuid;

use crate::application::ports::account_repository::AccountRepository;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::supervisor_channel::SupervisorChannel;
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::accounts::{Account, AccountSnapshot, Acct};
use crate::infrastructure::events::local::BroadcastStreamPublisher;
use crate::infrastructure::identicon::FileBackedIdenticonRenderer;

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

pub fn local_account(username: &str, avatar_url: Option<&str>, is_suspended: bool) -> Account {
    Account {
        id: Uuid::new_v4(),
        username: username.into(),
        host: None,
        avatar_url: avatar_url.map(Into::into),
        is_suspended,
        created_at: chrono::Utc::now(),
    }
}

#[derive(Default)]
pub struct InMemoryAccounts {
    pub accounts: Vec<Account>,
    pub fail: bool,
}

#[async_trait]
impl AccountRepository for InMemoryAccounts {
    async fn find_by_acct(&self, acct: &Acct) -> anyhow::Result<Option<Account>> {
        if self.fail {
            anyhow::bail!("accounts unavailable");
        }
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

pub struct ProfileState {
    pub account_id: Uuid,
    pub email: Option<String>,
    pub verify_code: Option<String>,
    pub email_verified: bool,
}

/// One profile with an optional pending verification code. Redeeming is
/// atomic under the mutex, matching the database contract.
pub struct InMemoryProfiles {
    pub state: Mutex<ProfileState>,
}

impl InMemoryProfiles {
    pub fn with_pending_code(account_id: Uuid, code: &str) -> Self {
        Self {
            state: Mutex::new(ProfileState {
                account_id,
                email: Some("alice@example.com".into()),
                verify_code: Some(code.into()),
                email_verified: false,
            }),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfiles {
    async fn redeem_verify_code(&self, code: &str) -> anyhow::Result<Option<Uuid>> {
        let mut state = self.state.lock().unwrap();
        if state.verify_code.as_deref() == Some(code) {
            state.verify_code = None;
            state.email_verified = true;
            Ok(Some(state.account_id))
        } else {
            Ok(None)
        }
    }

    async fn snapshot(&self, account_id: Uuid) -> anyhow::Result<Option<AccountSnapshot>> {
        let state = self.state.lock().unwrap();
        if state.account_id != account_id {
            return Ok(None);
        }
        Ok(Some(AccountSnapshot {
            id: state.account_id,
            username: "alice".into(),
            host: None,
            avatar_url: None,
            email: state.email.clone(),
            email_verified: state.email_verified,
        }))
    }
}

/// Counts notifications instead of talking to a real supervisor socket.
#[derive(Default)]
pub struct RecordingSupervisor {
    pub notified: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl SupervisorChannel for RecordingSupervisor {
    async fn notify_listen_failed(&self) -> anyhow::Result<()> {
        self.notified
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}

pub fn context_with(
    cfg: Config,
    accounts: InMemoryAccounts,
    profiles: InMemoryProfiles,
    supervisor: Option<Arc<dyn SupervisorChannel>>,
) -> AppContext {
    let (events_tx, _) = broadcast::channel(16);
    let services = AppServices::new(
        Arc::new(accounts),
        Arc::new(profiles),
        Arc::new(FileBackedIdenticonRenderer::new(None)),
        events_tx.clone(),
        Arc::new(BroadcastStreamPublisher::new(events_tx)),
        supervisor,
    );
    AppContext::new(cfg, services)
}

pub fn test_context() -> AppContext {
    context_with(
        test_config(),
        InMemoryAccounts::default(),
        InMemoryProfiles::with_pending_code(Uuid::new_v4(), "unused"),
        None,
    )
}
