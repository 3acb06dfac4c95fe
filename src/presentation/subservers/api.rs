use axum::{Json, Router, http::StatusCode, routing::get};

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// Built-in JSON API surface. Deployments with a full API service swap
/// this out; the gateway only cares that something answers under /api.
pub struct ApiServer;

impl SubServer for ApiServer {
    fn name(&self) -> &'static str {
        "api"
    }

    fn build(&self, _ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new().route("/ping", get(ping)).fallback(not_found))
    }
}

#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "System",
    responses((status = 200, description = "Liveness probe carrying the server clock"))
)]
pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "pong": chrono::Utc::now().timestamp_millis() }))
}

/// API clients get JSON even for unknown endpoints.
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": { "code": "UNKNOWN_ENDPOINT" } })),
    )
}
