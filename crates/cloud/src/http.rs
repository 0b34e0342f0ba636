//! HTTP plumbing shared by the catalog client and the asset fetcher:
//! retry with exponential backoff, and concurrent downloads to disk.

use crate::error::{CloudError, Result};
use reqwest::{Client, RequestBuilder, Response};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff before retry `attempt` (1-based): 500 ms, 1 s, 2 s, ...
pub(crate) fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500u64.saturating_mul(1u64 << (attempt - 1).min(16)))
}

/// Send `request`, retrying transport failures and non-4xx error statuses.
///
/// `what` names the request in log lines and error messages. Client errors
/// (4xx) fail immediately with the status and the start of the body.
pub(crate) async fn send_with_retry(
    request: RequestBuilder,
    max_retries: u32,
    what: &str,
) -> Result<Response> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            debug!(%what, attempt, ?delay, "retrying");
            tokio::time::sleep(delay).await;
        }

        let Some(req) = request.try_clone() else {
            // Streaming bodies cannot be replayed
            return Ok(request.send().await?);
        };

        match req.send().await {
            Ok(r) if r.status().is_success() => return Ok(r),
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                let err = CloudError::Network(format!(
                    "{what} returned HTTP {status}: {}",
                    body.chars().take(500).collect::<String>()
                ));
                if status.is_client_error() {
                    return Err(err);
                }
                warn!(%what, %status, attempt, "server error");
                last_err = Some(err);
            }
            Err(e) => {
                warn!(%what, error = %e, attempt, "request failed");
                last_err = Some(CloudError::Http(e));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| CloudError::Network(format!("{what} failed"))))
}

/// HTTP client for whole-file asset downloads.
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(request_timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            max_retries,
        })
    }

    /// Fetch a whole resource into memory.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = send_with_retry(self.client.get(url), self.max_retries, url).await?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Download `url` to `path`, returning the number of bytes written.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let bytes = self.get_bytes(url).await?;
        tokio::fs::write(path, &bytes).await?;
        debug!(%url, path = %path.display(), bytes = bytes.len(), "downloaded");
        Ok(bytes.len() as u64)
    }

    /// Download several `(url, path)` pairs concurrently.
    ///
    /// Returns one result per pair, in the same order.
    pub async fn download_all(&self, jobs: &[(String, PathBuf)]) -> Vec<Result<u64>> {
        use futures::stream::{FuturesOrdered, StreamExt};

        let mut futs = FuturesOrdered::new();
        for (url, path) in jobs {
            futs.push_back(self.download(url, path));
        }

        let mut results = Vec::with_capacity(jobs.len());
        while let Some(res) = futs.next().await {
            results.push(res);
        }
        results
    }
}
