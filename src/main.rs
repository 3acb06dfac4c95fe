use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::sync::broadcast;
use tracing::info;

use gateway::application::ports::stream_publisher::StreamPublisher;
use gateway::application::ports::supervisor_channel::SupervisorChannel;
use gateway::bootstrap::app_context::{AppContext, AppServices};
use gateway::bootstrap::config::Config;
use gateway::infrastructure::db;
use gateway::infrastructure::db::repositories::account_repository_sqlx::SqlxAccountRepository;
use gateway::infrastructure::db::repositories::profile_repository_sqlx::SqlxProfileRepository;
use gateway::infrastructure::events::local::BroadcastStreamPublisher;
use gateway::infrastructure::events::redis::{RedisStreamPublisher, spawn_stream_bridge};
use gateway::infrastructure::identicon::FileBackedIdenticonRenderer;
use gateway::infrastructure::supervisor::UnixSupervisorChannel;
use gateway::presentation::ws::event_stream::EventStreamHandler;
use gateway::server::{Gateway, SubServers};

const STREAM_KEY: &str = "lantern:account_events";
const STREAM_MAX_LEN: usize = 10_000;
const BRIDGE_RETRY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "gateway=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting Lantern gateway");

    let pool = db::connect_pool(&cfg.database_url, 10).await?;
    db::migrate(&pool).await?;

    let account_repo = Arc::new(SqlxAccountRepository::new(pool.clone()));
    let profile_repo = Arc::new(SqlxProfileRepository::new(pool.clone()));
    let identicon_renderer = Arc::new(FileBackedIdenticonRenderer::new(cfg.scratch_dir.clone()));

    // Every stream subscription hangs off this channel; in cluster mode the
    // Redis bridge is the only writer, locally the publisher is.
    let (account_events, _) = broadcast::channel(1024);

    let stream_publisher: Arc<dyn StreamPublisher> = if cfg.cluster_mode {
        info!("cluster_mode_enabled");
        let redis_url = cfg
            .redis_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("REDIS_URL is required in cluster mode"))?;
        let publisher = RedisStreamPublisher::connect(&redis_url, STREAM_KEY, STREAM_MAX_LEN)
            .await?;
        spawn_stream_bridge(
            redis_url,
            STREAM_KEY.to_string(),
            account_events.clone(),
            BRIDGE_RETRY,
        );
        Arc::new(publisher)
    } else {
        info!("cluster_mode_disabled_using_local_bus");
        Arc::new(BroadcastStreamPublisher::new(account_events.clone()))
    };

    let supervisor: Option<Arc<dyn SupervisorChannel>> = cfg
        .supervisor_socket
        .clone()
        .map(|path| Arc::new(UnixSupervisorChannel::new(path)) as Arc<dyn SupervisorChannel>);

    let services = AppServices::new(
        account_repo,
        profile_repo,
        identicon_renderer,
        account_events,
        stream_publisher,
        supervisor,
    );
    let ctx = AppContext::new(cfg, services);

    let streaming = Arc::new(EventStreamHandler::new(ctx.clone()));
    Gateway::new(ctx, SubServers::builtin(), streaming).run().await
}
