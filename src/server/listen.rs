use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Why a bind attempt failed, reduced to the classes operators act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindFailureKind {
    PermissionDenied,
    AddrInUse,
    Other,
}

impl BindFailureKind {
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AddrInUse => Self::AddrInUse,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to listen on port {port}: {source}")]
pub struct BindError {
    pub port: u16,
    pub kind: BindFailureKind,
    #[source]
    pub source: io::Error,
}

impl BindError {
    pub fn new(port: u16, source: io::Error) -> Self {
        let kind = BindFailureKind::classify(&source);
        Self { port, kind, source }
    }
}

/// Binds the shared listener on all interfaces.
pub async fn bind(port: u16) -> Result<TcpListener, BindError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|err| BindError::new(port, err))
}

/// Operator-facing diagnosis of a failed bind. Each class gets its own
/// message naming the configured port; unexpected kinds carry the raw error.
pub fn log_bind_failure(err: &BindError) {
    match err.kind {
        BindFailureKind::PermissionDenied => {
            tracing::error!(
                port = err.port,
                "listen_failed_permission_denied: binding this port needs elevated privileges"
            );
        }
        BindFailureKind::AddrInUse => {
            tracing::error!(
                port = err.port,
                "listen_failed_addr_in_use: another process already owns this port"
            );
        }
        BindFailureKind::Other => {
            tracing::error!(port = err.port, error = ?err.source, "listen_failed");
        }
    }
}
