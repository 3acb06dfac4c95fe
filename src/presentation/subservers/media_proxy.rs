use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::Response,
    routing::get,
};
use futures_util::StreamExt;
use serde::Deserialize;
use url::Url;

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// Relays remote media through this instance so clients never talk to
/// foreign hosts directly. Responses are buffered under a hard size cap.
pub struct MediaProxyServer {
    client: reqwest::Client,
}

impl MediaProxyServer {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for MediaProxyServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubServer for MediaProxyServer {
    fn name(&self) -> &'static str {
        "media-proxy"
    }

    fn build(&self, ctx: &AppContext) -> anyhow::Result<Router> {
        let state = ProxyState {
            client: self.client.clone(),
            max_bytes: ctx.cfg.proxy_max_bytes,
        };
        Ok(Router::new()
            .route("/", get(relay))
            .route("/*name", get(relay))
            .with_state(state))
    }
}

#[derive(Clone)]
struct ProxyState {
    client: reqwest::Client,
    max_bytes: usize,
}

#[derive(Debug, Deserialize)]
struct RelayQuery {
    url: String,
}

async fn relay(
    State(state): State<ProxyState>,
    Query(query): Query<RelayQuery>,
) -> Result<Response, StatusCode> {
    let target = Url::parse(&query.url).map_err(|_| StatusCode::BAD_REQUEST)?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(StatusCode::BAD_REQUEST);
    }

    let upstream = state.client.get(target.clone()).send().await.map_err(|err| {
        tracing::warn!(url = %target, error = ?err, "media_proxy_fetch_failed");
        StatusCode::BAD_GATEWAY
    })?;
    if !upstream.status().is_success() {
        return Err(StatusCode::BAD_GATEWAY);
    }
    if let Some(len) = upstream.content_length() {
        if len as usize > state.max_bytes {
            return Err(StatusCode::BAD_GATEWAY);
        }
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut body = Vec::new();
    let mut stream = upstream.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| {
            tracing::warn!(url = %target, error = ?err, "media_proxy_read_failed");
            StatusCode::BAD_GATEWAY
        })?;
        if body.len() + chunk.len() > state.max_bytes {
            tracing::warn!(url = %target, cap = state.max_bytes, "media_proxy_size_cap_hit");
            return Err(StatusCode::BAD_GATEWAY);
        }
        body.extend_from_slice(&chunk);
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(body))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryAccounts, InMemoryProfiles, context_with, test_config};
    use axum::body::to_bytes;
    use axum::http::Request;
    use axum::routing::get as axum_get;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn app(max_bytes: usize) -> Router {
        let mut cfg = test_config();
        cfg.proxy_max_bytes = max_bytes;
        let ctx = context_with(
            cfg,
            InMemoryAccounts::default(),
            InMemoryProfiles::with_pending_code(Uuid::new_v4(), "x"),
            None,
        );
        MediaProxyServer::new().build(&ctx).unwrap()
    }

    async fn fetch(app: Router, path_and_query: &str) -> (StatusCode, Vec<u8>) {
        let res = app
            .oneshot(
                Request::builder()
                    .uri(path_and_query)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), 10 * 1024 * 1024).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn missing_url_param_is_bad_request() {
        let (status, _) = fetch(app(1024), "/image.png").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_http_schemes_are_rejected() {
        let (status, _) = fetch(app(1024), "/x?url=file%3A%2F%2F%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn relays_upstream_bytes_with_nosniff() {
        let upstream = spawn_upstream(Router::new().route(
            "/cat.gif",
            axum_get(|| async {
                Response::builder()
                    .header(header::CONTENT_TYPE, "image/gif")
                    .body(Body::from("GIF89a"))
                    .unwrap()
            }),
        ))
        .await;

        let uri = format!("/cat.gif?url={}/cat.gif", urlencode(&upstream));
        let res = app(1024)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "image/gif");
        assert_eq!(
            res.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        let body = to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"GIF89a");
    }

    #[tokio::test]
    async fn upstream_error_status_maps_to_bad_gateway() {
        let upstream = spawn_upstream(Router::new()).await;
        let uri = format!("/x?url={}/missing", urlencode(&upstream));
        let (status, _) = fetch(app(1024), &uri).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let upstream = spawn_upstream(Router::new().route(
            "/big.bin",
            axum_get(|| async { vec![0u8; 64] }),
        ))
        .await;
        let uri = format!("/big.bin?url={}/big.bin", urlencode(&upstream));
        let (status, _) = fetch(app(8), &uri).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_bad_gateway() {
        let uri = format!("/x?url={}", urlencode("http://127.0.0.1:1/x"));
        let (status, _) = fetch(app(1024), &uri).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    fn urlencode(raw: &str) -> String {
        url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
    }
}
