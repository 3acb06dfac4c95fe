use async_trait::async_trait;
use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use uuid::Uuid;

use crate::application::ports::streaming_handler::StreamingHandler;
use crate::bootstrap::app_context::AppContext;

/// Development default for the streaming surface: a WebSocket at `/streaming`
/// forwarding one account's stream events as JSON text frames. The account
/// binding is taken verbatim from the `i` query parameter; deployments that
/// need real session authentication attach their own handler instead.
pub struct EventStreamHandler {
    ctx: AppContext,
}

impl EventStreamHandler {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl StreamingHandler for EventStreamHandler {
    fn name(&self) -> &'static str {
        "event-stream"
    }

    fn wants(&self, req: &Request<Body>) -> bool {
        req.uri().path() == "/streaming"
    }

    async fn handle(&self, req: Request<Body>) -> Response {
        let (mut parts, _body) = req.into_parts();
        let ws = match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
            Ok(ws) => ws,
            Err(rejection) => return rejection.into_response(),
        };
        let account_id = account_binding(parts.uri.query());
        let ctx = self.ctx.clone();
        ws.on_upgrade(move |socket| forward_events(socket, ctx, account_id))
    }
}

fn account_binding(query: Option<&str>) -> Option<Uuid> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "i")
        .and_then(|(_, value)| Uuid::parse_str(&value).ok())
}

async fn forward_events(mut socket: WebSocket, ctx: AppContext, account_id: Option<Uuid>) {
    let Some(account_id) = account_id else {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: "missing account binding".into(),
            })))
            .await;
        return;
    };

    tracing::debug!(%account_id, "event_stream_opened");
    let mut events = ctx.subscribe_account_stream();
    loop {
        tokio::select! {
            event = events.next() => {
                let Some(scoped) = event else { break };
                if scoped.account_id != account_id {
                    continue;
                }
                let payload = match serde_json::to_string(&scoped.event) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::warn!(error = ?err, "event_stream_encode_failed");
                        continue;
                    }
                };
                if socket.send(Message::Text(payload)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    tracing::debug!(%account_id, "event_stream_closed");
}
