//! Minimal HTTP fetcher for binary assets.
//!
//! Deliberately small next to a full API client: one GET, bytes out,
//! structured `tracing` on the way through. The connect phase is bounded but
//! the transfer itself is not, since gallery masters can run to hundreds of
//! megabytes.

use std::time::Duration;

use apogee_common::{HarvesterError, Result};
use reqwest::Client;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct FetchClient {
    inner: Client,
}

impl FetchClient {
    pub fn new() -> Result<Self> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build http client: {e}"))?;
        Ok(Self { inner })
    }

    /// GET `url` and return the body bytes. Non-2xx statuses are errors.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(target: "fetch", %url, "fetch.request.start");
        let t0 = std::time::Instant::now();

        let resp = self.inner.get(url).send().await.map_err(|e| {
            HarvesterError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(target: "fetch", %url, %status, "fetch.request.error");
            return Err(HarvesterError::Download {
                url: url.to_string(),
                reason: format!("server returned {status}"),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| HarvesterError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(
            target: "fetch",
            %url,
            body_len = bytes.len(),
            duration_ms = t0.elapsed().as_millis() as u64,
            "fetch.request.done"
        );
        Ok(bytes.to_vec())
    }
}
