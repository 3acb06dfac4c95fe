use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::Service;

use crate::application::ports::streaming_handler::StreamingHandler;

/// Wraps the routed surface so upgrade requests can be intercepted before
/// route dispatch. Requests without upgrade intent, and upgrades the
/// handler does not claim, flow to the inner router untouched.
///
/// This sits outside the router on purpose: the attached protocol owns the
/// whole connection once claimed, which is not something a routed handler
/// can express.
#[derive(Clone)]
pub struct StreamingAttach<S> {
    inner: S,
    handler: Arc<dyn StreamingHandler>,
}

impl<S> StreamingAttach<S> {
    pub fn new(inner: S, handler: Arc<dyn StreamingHandler>) -> Self {
        Self { inner, handler }
    }
}

fn has_upgrade_intent(req: &Request<Body>) -> bool {
    req.headers().contains_key(header::UPGRADE)
}

impl<S> Service<Request<Body>> for StreamingAttach<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if has_upgrade_intent(&req) && self.handler.wants(&req) {
            tracing::debug!(handler = self.handler.name(), path = %req.uri().path(), "upgrade_claimed");
            let handler = self.handler.clone();
            return Box::pin(async move { Ok(handler.handle(req).await) });
        }
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    struct ClaimPath {
        path: &'static str,
    }

    #[async_trait]
    impl StreamingHandler for ClaimPath {
        fn name(&self) -> &'static str {
            "test-streaming"
        }

        fn wants(&self, req: &Request<Body>) -> bool {
            req.uri().path() == self.path
        }

        async fn handle(&self, _req: Request<Body>) -> Response {
            Response::builder()
                .status(StatusCode::SWITCHING_PROTOCOLS)
                .body(Body::empty())
                .unwrap()
        }
    }

    fn app() -> StreamingAttach<Router> {
        let router = Router::new().route("/streaming", get(|| async { "routed" }));
        StreamingAttach::new(router, Arc::new(ClaimPath { path: "/streaming" }))
    }

    fn upgrade_request(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header(header::UPGRADE, "websocket")
            .header(header::CONNECTION, "upgrade")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn claims_matching_upgrade_requests() {
        let res = app().oneshot(upgrade_request("/streaming")).await.unwrap();
        assert_eq!(res.status(), StatusCode::SWITCHING_PROTOCOLS);
    }

    #[tokio::test]
    async fn plain_requests_reach_the_router() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/streaming")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // Same path, but without upgrade intent it is an ordinary GET.
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unclaimed_upgrades_fall_through() {
        let res = app().oneshot(upgrade_request("/elsewhere")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
