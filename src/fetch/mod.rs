mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use bytes::Bytes;
use tracing::debug;

/// Downloads a dataset, failing on any non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Bytes> {
    let resp = client.get(url.parse()?).await?.error_for_status()?;
    debug!(status = %resp.status(), "Dataset downloaded");
    Ok(resp.bytes().await?)
}
