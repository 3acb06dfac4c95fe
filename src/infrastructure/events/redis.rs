use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use redis::streams::{StreamReadOptions, StreamReadReply};
use tokio::time::sleep;

use crate::application::ports::stream_publisher::{AccountScopedEvent, StreamPublisher};

const FIELD_EVENT: &str = "event";

/// Cross-node event bus backed by a single Redis stream. `publish` appends;
/// every process runs a bridge task that reads the stream back (own entries
/// included) and fans entries into its local broadcast channel, so delivery
/// order is the stream's order on every node.
pub struct RedisStreamPublisher {
    conn: ConnectionManager,
    stream_key: String,
    stream_max_len: usize,
}

impl RedisStreamPublisher {
    pub async fn connect(
        redis_url: &str,
        stream_key: impl Into<String>,
        stream_max_len: usize,
    ) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url).context("redis_open")?;
        let conn = ConnectionManager::new(client)
            .await
            .context("redis_connect")?;
        Ok(Self {
            conn,
            stream_key: stream_key.into(),
            stream_max_len,
        })
    }
}

#[async_trait]
impl StreamPublisher for RedisStreamPublisher {
    async fn publish(&self, event: &AccountScopedEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.stream_max_len as i64)
            .arg("*")
            .arg(FIELD_EVENT)
            .arg(payload)
            .query_async(&mut conn)
            .await
            .context("redis_xadd_event")?;
        Ok(())
    }
}

/// Tails the shared stream from "now" and re-broadcasts locally. Reconnects
/// with a delay on any Redis error; runs for the life of the process.
pub fn spawn_stream_bridge(
    redis_url: String,
    stream_key: String,
    sender: tokio::sync::broadcast::Sender<AccountScopedEvent>,
    poll_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let client = match redis::Client::open(redis_url.as_str()) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(error = ?err, "redis_bridge_open_failed");
                return;
            }
        };
        let mut last_id = "$".to_string();
        loop {
            let mut conn = match client.get_multiplexed_async_connection().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::error!(stream = %stream_key, error = ?err, "redis_stream_connect_failed");
                    sleep(poll_interval).await;
                    continue;
                }
            };
            loop {
                let opts = StreamReadOptions::default().block(1000).count(128);
                let keys = [stream_key.as_str()];
                let ids = [last_id.as_str()];
                let reply: redis::RedisResult<StreamReadReply> =
                    conn.xread_options(&keys, &ids, &opts).await;
                match reply {
                    Ok(data) => {
                        let mut advanced = false;
                        for stream in data.keys {
                            for entry in stream.ids {
                                let Some(raw) = entry.get::<String>(FIELD_EVENT) else {
                                    continue;
                                };
                                last_id = entry.id.clone();
                                advanced = true;
                                match serde_json::from_str::<AccountScopedEvent>(&raw) {
                                    // No receivers right now is fine; drop it.
                                    Ok(event) => {
                                        let _ = sender.send(event);
                                    }
                                    Err(err) => {
                                        tracing::warn!(entry = %entry.id, error = ?err, "stream_event_decode_failed");
                                    }
                                }
                            }
                        }
                        if !advanced {
                            tokio::task::yield_now().await;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(stream = %stream_key, error = ?err, "redis_stream_read_failed");
                        sleep(poll_interval).await;
                        break;
                    }
                }
            }
        }
    })
}
