use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::Acct;

/// The `/.well-known/*` endpoints remote software probes before anything
/// else: the NodeInfo index, host-meta and webfinger.
pub struct WellKnownServer;

impl SubServer for WellKnownServer {
    fn name(&self) -> &'static str {
        "well-known"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new()
            .route("/.well-known/nodeinfo", get(nodeinfo_index))
            .route("/.well-known/host-meta", get(host_meta))
            .route("/.well-known/webfinger", get(webfinger))
            .with_state(ctx.clone()))
    }
}

async fn nodeinfo_index(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "links": [
            {
                "rel": "http://nodeinfo.diaspora.software/ns/schema/2.1",
                "href": ctx.cfg.absolute_url("/nodeinfo/2.1"),
            },
            {
                "rel": "http://nodeinfo.diaspora.software/ns/schema/2.0",
                "href": ctx.cfg.absolute_url("/nodeinfo/2.0"),
            },
        ],
    }))
}

async fn host_meta(State(ctx): State<AppContext>) -> impl IntoResponse {
    let template = format!(
        "{}?resource={{uri}}",
        ctx.cfg.absolute_url("/.well-known/webfinger")
    );
    let xrd = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <XRD xmlns=\"http://docs.oasis-open.org/ns/xri/xrd-1.0\">\n\
         <Link rel=\"lrdd\" template=\"{template}\"/>\n\
         </XRD>\n"
    );
    (
        [(header::CONTENT_TYPE, "application/xrd+xml; charset=utf-8")],
        xrd,
    )
}

#[derive(Debug, Deserialize)]
struct WebfingerQuery {
    resource: String,
}

/// Resolves `acct:` resources to link documents. Only local, unsuspended
/// accounts are disclosed.
async fn webfinger(
    State(ctx): State<AppContext>,
    Query(query): Query<WebfingerQuery>,
) -> Result<Response, StatusCode> {
    let raw = query
        .resource
        .strip_prefix("acct:")
        .unwrap_or(&query.resource);
    let acct = Acct::parse_bare(raw)
        .map_err(|_| StatusCode::BAD_REQUEST)?
        .normalize_local(&ctx.cfg.host);
    if !acct.is_local() {
        return Err(StatusCode::NOT_FOUND);
    }

    let account = ctx
        .account_repo()
        .find_by_acct(&acct)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "webfinger_lookup_failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .filter(|a| !a.is_suspended)
        .ok_or(StatusCode::NOT_FOUND)?;

    let doc = serde_json::json!({
        "subject": format!("acct:{}@{}", account.username, ctx.cfg.host),
        "links": [
            {
                "rel": "self",
                "type": "application/activity+json",
                "href": ctx.cfg.absolute_url(&format!("/users/{}", account.id)),
            },
            {
                "rel": "http://webfinger.net/rel/profile-page",
                "type": "text/html",
                "href": ctx.cfg.absolute_url(&format!("/@{}", account.username)),
            },
        ],
    });
    Ok(([(header::CONTENT_TYPE, "application/jrd+json")], Json(doc)).into_response())
}
