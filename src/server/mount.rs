use std::sync::Arc;

use anyhow::Context;
use axum::Router;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// Where a sub-server hangs off the shared listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPoint {
    /// Nested under a path prefix, e.g. `/api`.
    Prefix(&'static str),
    /// Merged at the root. Its routes must be disjoint from every other
    /// root mount; axum refuses overlapping routes at composition time.
    Root,
    /// Receives every request no other mount matched. Only legal as the
    /// final entry, so nothing can sit in its shadow.
    CatchAll,
}

pub struct MountEntry {
    pub at: MountPoint,
    pub server: Arc<dyn SubServer>,
}

impl MountEntry {
    pub fn new(at: MountPoint, server: Arc<dyn SubServer>) -> Self {
        Self { at, server }
    }
}

/// Folds the mount table into a single router, in table order. Any
/// sub-server build failure, a bad prefix, or a misplaced catch-all aborts
/// composition; the gateway never starts with a partial route table.
pub fn compose(entries: &[MountEntry], ctx: &AppContext) -> anyhow::Result<Router> {
    let mut router = Router::new();
    for (i, entry) in entries.iter().enumerate() {
        let name = entry.server.name();
        let sub = entry
            .server
            .build(ctx)
            .with_context(|| format!("building sub-server '{name}'"))?;
        router = match entry.at {
            MountPoint::Prefix(prefix) => {
                anyhow::ensure!(
                    prefix.len() > 1 && prefix.starts_with('/'),
                    "sub-server '{name}' has invalid mount prefix {prefix:?}"
                );
                tracing::debug!(sub_server = name, prefix, "mounting_prefixed");
                router.nest(prefix, sub)
            }
            MountPoint::Root => {
                tracing::debug!(sub_server = name, "mounting_root");
                router.merge(sub)
            }
            MountPoint::CatchAll => {
                anyhow::ensure!(
                    i == entries.len() - 1,
                    "catch-all sub-server '{name}' must be the last mount"
                );
                tracing::debug!(sub_server = name, "mounting_catch_all");
                router.fallback_service(sub)
            }
        };
    }
    Ok(router)
}
