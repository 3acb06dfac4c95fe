use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};

/// A protocol handler attached in front of the HTTP router. The gateway
/// invokes it for requests that arrive with an upgrade intent; everything
/// else flows to the routed sub-servers untouched.
#[async_trait]
pub trait StreamingHandler: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;
    /// Whether this handler claims the request. Must only inspect head
    /// material (URI, headers), never the body.
    fn wants(&self, req: &Request<Body>) -> bool;
    /// Completes the handshake and drives the upgraded connection. The
    /// returned response is the handshake reply (101 on success).
    async fn handle(&self, req: Request<Body>) -> Response;
}
