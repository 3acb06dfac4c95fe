use async_trait::async_trait;

#[async_trait]
pub trait SupervisorChannel: Send + Sync {
    /// Tells the process supervisor this worker failed to take its listener.
    /// Best-effort: the caller logs a delivery error and moves on.
    async fn notify_listen_failed(&self) -> anyhow::Result<()>;
}
