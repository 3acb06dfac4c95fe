use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

const SOFTWARE_NAME: &str = "lantern";

/// Publishes NodeInfo documents so crawlers and peer instances can see what
/// software this node runs and how many accounts live here.
pub struct DiscoveryServer;

impl SubServer for DiscoveryServer {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new()
            .route("/nodeinfo/2.1", get(nodeinfo_2_1))
            .route("/nodeinfo/2.0", get(nodeinfo_2_0))
            .with_state(ctx.clone()))
    }
}

async fn nodeinfo_2_1(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    document(&ctx, "2.1").await.map(Json)
}

async fn nodeinfo_2_0(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    document(&ctx, "2.0").await.map(Json)
}

async fn document(ctx: &AppContext, version: &str) -> Result<serde_json::Value, StatusCode> {
    let total = ctx.account_repo().count_local().await.map_err(|err| {
        tracing::error!(error = ?err, "nodeinfo_user_count_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(serde_json::json!({
        "version": version,
        "software": {
            "name": SOFTWARE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "protocols": ["activitypub"],
        "services": { "inbound": [], "outbound": [] },
        "openRegistrations": false,
        "usage": { "users": { "total": total } },
        "metadata": { "nodeName": ctx.cfg.instance_name },
    }))
}
