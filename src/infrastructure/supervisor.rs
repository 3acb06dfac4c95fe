use std::path::PathBuf;

use async_trait::async_trait;
use tokio::net::UnixDatagram;

use crate::application::ports::supervisor_channel::SupervisorChannel;

/// Payload of a worker's "I could not bind" report.
pub const LISTEN_FAILED: &[u8] = b"listen-failed";

/// Reports worker failures to the process supervisor over a Unix datagram
/// socket. One datagram per report; no reply expected.
pub struct UnixSupervisorChannel {
    socket_path: PathBuf,
}

impl UnixSupervisorChannel {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl SupervisorChannel for UnixSupervisorChannel {
    async fn notify_listen_failed(&self) -> anyhow::Result<()> {
        let socket = UnixDatagram::unbound()?;
        socket.send_to(LISTEN_FAILED, &self.socket_path).await?;
        Ok(())
    }
}
