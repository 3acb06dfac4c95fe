use axum::{Router, body::Bytes, extract::Path, http::StatusCode, routing::post};

use crate::application::ports::sub_server::SubServer;
use crate::bootstrap::app_context::AppContext;

/// Accepts ActivityPub deliveries. Activities are acknowledged here and
/// processed by the federation engine running outside this gateway.
pub struct FederationServer;

impl SubServer for FederationServer {
    fn name(&self) -> &'static str {
        "federation"
    }

    fn build(&self, _ctx: &AppContext) -> anyhow::Result<Router> {
        Ok(Router::new()
            .route("/inbox", post(shared_inbox))
            .route("/users/:id/inbox", post(user_inbox)))
    }
}

async fn shared_inbox(body: Bytes) -> StatusCode {
    tracing::debug!(bytes = body.len(), "inbox_activity_received");
    StatusCode::ACCEPTED
}

async fn user_inbox(Path(id): Path<String>, body: Bytes) -> StatusCode {
    tracing::debug!(user_id = %id, bytes = body.len(), "user_inbox_activity_received");
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_context;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        FederationServer.build(&test_context()).unwrap()
    }

    #[tokio::test]
    async fn shared_inbox_accepts_activities() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/inbox")
                    .body(Body::from(r#"{"type":"Create"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn user_inbox_accepts_activities() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/9fz1sb14/inbox")
                    .body(Body::from(r#"{"type":"Follow"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn inbox_is_post_only() {
        let res = app()
            .oneshot(Request::builder().uri("/inbox").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
