use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;

pub type PngStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// A rendered identicon ready to be streamed to a client.
pub struct IdenticonPng {
    pub len: u64,
    pub stream: PngStream,
}

#[async_trait]
pub trait IdenticonRenderer: Send + Sync {
    /// Renders the identicon for `seed`. The same seed always yields the
    /// same image.
    async fn render(&self, seed: &str) -> anyhow::Result<IdenticonPng>;
}
