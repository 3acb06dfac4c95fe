use axum::Router;

use crate::bootstrap::app_context::AppContext;

/// One sub-application the gateway mounts onto the shared listener. The
/// gateway decides where a sub-server is mounted; implementations only
/// describe routes relative to their own root.
///
/// A `build` error is fatal: the gateway refuses to start with a partial
/// route table.
pub trait SubServer: Send + Sync {
    /// Stable name used in logs and startup errors.
    fn name(&self) -> &'static str;
    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router>;
}
