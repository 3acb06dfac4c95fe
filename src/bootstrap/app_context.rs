use std::sync::Arc;

use futures_util::{StreamExt, stream::BoxStream};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::application::ports::account_repository::AccountRepository;
use crate::application::ports::identicon_renderer::IdenticonRenderer;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::stream_publisher::{AccountScopedEvent, StreamPublisher};
use crate::application::ports::supervisor_channel::SupervisorChannel;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    account_repo: Arc<dyn AccountRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    identicon_renderer: Arc<dyn IdenticonRenderer>,
    /// In-process fan-out channel behind every stream subscription. In
    /// cluster mode the Redis bridge feeds it; otherwise the publisher
    /// sends straight into it.
    account_events: broadcast::Sender<AccountScopedEvent>,
    stream_publisher: Arc<dyn StreamPublisher>,
    supervisor: Option<Arc<dyn SupervisorChannel>>,
}

impl AppServices {
    pub fn new(
        account_repo: Arc<dyn AccountRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        identicon_renderer: Arc<dyn IdenticonRenderer>,
        account_events: broadcast::Sender<AccountScopedEvent>,
        stream_publisher: Arc<dyn StreamPublisher>,
        supervisor: Option<Arc<dyn SupervisorChannel>>,
    ) -> Self {
        Self {
            account_repo,
            profile_repo,
            identicon_renderer,
            account_events,
            stream_publisher,
            supervisor,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn account_repo(&self) -> Arc<dyn AccountRepository> {
        self.services.account_repo.clone()
    }

    pub fn profile_repo(&self) -> Arc<dyn ProfileRepository> {
        self.services.profile_repo.clone()
    }

    pub fn identicon_renderer(&self) -> Arc<dyn IdenticonRenderer> {
        self.services.identicon_renderer.clone()
    }

    pub fn stream_publisher(&self) -> Arc<dyn StreamPublisher> {
        self.services.stream_publisher.clone()
    }

    pub fn supervisor(&self) -> Option<Arc<dyn SupervisorChannel>> {
        self.services.supervisor.clone()
    }

    pub fn subscribe_account_stream(&self) -> BoxStream<'static, AccountScopedEvent> {
        BroadcastStream::new(self.services.account_events.subscribe())
            .filter_map(|evt| async move { evt.ok() })
            .boxed()
    }
}
