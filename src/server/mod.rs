//! The gateway itself: mount-table composition, the security layer, the
//! streaming attachment, and the listen/serve path with its failure policy.

pub mod listen;
pub mod mount;
pub mod security;
pub mod upgrade;

use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use tower_http::trace::TraceLayer;

use crate::application::ports::streaming_handler::StreamingHandler;
use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::GatewayEndpoints;
use crate::presentation::subservers::{
    api::ApiServer, discovery::DiscoveryServer, federation::FederationServer, files::FilesServer,
    media_proxy::MediaProxyServer, web::WebServer, well_known::WellKnownServer,
};
use listen::{BindError, log_bind_failure};
use mount::{MountEntry, MountPoint};
use upgrade::StreamingAttach;

/// The delegated sub-servers, one named slot per mount. A struct rather
/// than a list: the mount order is part of the contract and stays with the
/// gateway, embedders only swap implementations.
pub struct SubServers {
    pub api: Arc<dyn SubServer>,
    pub files: Arc<dyn SubServer>,
    pub media_proxy: Arc<dyn SubServer>,
    pub federation: Arc<dyn SubServer>,
    pub discovery: Arc<dyn SubServer>,
    pub well_known: Arc<dyn SubServer>,
    pub web: Arc<dyn SubServer>,
}

impl SubServers {
    /// The built-in set the binary ships with.
    pub fn builtin() -> Self {
        Self {
            api: Arc::new(ApiServer),
            files: Arc::new(FilesServer),
            media_proxy: Arc::new(MediaProxyServer::new()),
            federation: Arc::new(FederationServer),
            discovery: Arc::new(DiscoveryServer),
            well_known: Arc::new(WellKnownServer),
            web: Arc::new(WebServer),
        }
    }
}

/// What the process should do after a listen failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureDirective {
    /// Worker under a cluster supervisor: the parent has been signalled,
    /// the worker stays alive until the parent decides its fate.
    HoldWorker,
    /// Standalone: nobody above us to decide, exit non-zero.
    ExitProcess,
}

pub struct Gateway {
    ctx: AppContext,
    sub_servers: SubServers,
    streaming: Arc<dyn StreamingHandler>,
}

impl Gateway {
    pub fn new(
        ctx: AppContext,
        sub_servers: SubServers,
        streaming: Arc<dyn StreamingHandler>,
    ) -> Self {
        Self {
            ctx,
            sub_servers,
            streaming,
        }
    }

    /// The fixed mount table. Prefixed mounts first, then the root-level
    /// protocol surfaces, the gateway's own endpoints, and finally the web
    /// front end catching everything left.
    fn mount_table(&self) -> Vec<MountEntry> {
        vec![
            MountEntry::new(MountPoint::Prefix("/api"), self.sub_servers.api.clone()),
            MountEntry::new(MountPoint::Prefix("/files"), self.sub_servers.files.clone()),
            MountEntry::new(
                MountPoint::Prefix("/proxy"),
                self.sub_servers.media_proxy.clone(),
            ),
            MountEntry::new(MountPoint::Root, self.sub_servers.federation.clone()),
            MountEntry::new(MountPoint::Root, self.sub_servers.discovery.clone()),
            MountEntry::new(MountPoint::Root, self.sub_servers.well_known.clone()),
            MountEntry::new(MountPoint::Root, Arc::new(GatewayEndpoints)),
            MountEntry::new(MountPoint::CatchAll, self.sub_servers.web.clone()),
        ]
    }

    /// Composes the routable surface: the mount table, the HSTS stamp, and
    /// request tracing. Runs before the socket opens; any failure is fatal.
    pub fn build_router(&self) -> anyhow::Result<Router> {
        let mut router = mount::compose(&self.mount_table(), &self.ctx)?;
        if let Some(hsts) = security::hsts_layer(&self.ctx.cfg) {
            router = router.layer(hsts);
        }
        Ok(router.layer(TraceLayer::new_for_http().make_span_with(
            |req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            },
        )))
    }

    /// The full front-door service: the routed surface wrapped by the
    /// streaming attachment. This is what `run` serves.
    pub fn build_service(&self) -> anyhow::Result<StreamingAttach<Router>> {
        Ok(StreamingAttach::new(
            self.build_router()?,
            self.streaming.clone(),
        ))
    }

    /// Binds the port and serves until shutdown. Bind and serve failures
    /// take the classified path: a worker reports to the supervisor and
    /// parks, a standalone process propagates the error out of `main`.
    pub async fn run(&self) -> anyhow::Result<()> {
        let service = self.build_service()?;
        let port = self.ctx.cfg.port;

        let listener = match listen::bind(port).await {
            Ok(listener) => listener,
            Err(err) => return self.handle_listen_failure(err).await,
        };
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(%addr, "gateway_listening");
        }

        let make_service =
            axum::ServiceExt::<axum::extract::Request>::into_make_service(service);
        let served = axum::serve(listener, make_service)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        match served {
            Ok(()) => Ok(()),
            Err(err) => self.handle_listen_failure(BindError::new(port, err)).await,
        }
    }

    async fn handle_listen_failure(&self, err: BindError) -> anyhow::Result<()> {
        match self.report_listen_failure(&err).await {
            FailureDirective::ExitProcess => Err(err.into()),
            FailureDirective::HoldWorker => {
                // Respawn or teardown is the supervisor's call; exiting on
                // our own would race it. Park until told to die.
                shutdown_signal().await;
                Ok(())
            }
        }
    }

    async fn report_listen_failure(&self, err: &BindError) -> FailureDirective {
        log_bind_failure(err);
        if !self.ctx.cfg.cluster_mode {
            return FailureDirective::ExitProcess;
        }
        match self.ctx.supervisor() {
            Some(channel) => {
                if let Err(notify_err) = channel.notify_listen_failed().await {
                    tracing::error!(error = ?notify_err, "supervisor_notify_failed");
                }
            }
            None => tracing::error!("cluster_mode_without_supervisor_channel"),
        }
        FailureDirective::HoldWorker
    }
}

/// Resolves on SIGTERM or ctrl-c.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = ?err, "ctrl_c_hook_install_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "sigterm_hook_install_failed");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown_signal_received");
}
