//! Page fetching with a bounded timeout.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use capnote_core::defaults::{FETCH_TIMEOUT_SECS, FETCH_USER_AGENT};
use capnote_core::{Error, Result};

/// Configuration for [`PageFetcher`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent header.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: FETCH_TIMEOUT_SECS,
            user_agent: FETCH_USER_AGENT.to_string(),
        }
    }
}

/// Owns the outbound connection pool used for page fetches.
///
/// One attempt per URL; the pool is released when the fetcher is dropped.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            subsystem = "extract",
            component = "fetcher",
            timeout_secs = config.timeout_seconds,
            "Page fetcher ready"
        );

        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(FetchConfig::default())
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `url` and return its body, or `None` on any failure.
    ///
    /// Only a `200 OK` counts as success.
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        let start = Instant::now();
        match self.try_fetch(url).await {
            Ok(body) => {
                debug!(
                    subsystem = "extract",
                    component = "fetcher",
                    op = "fetch",
                    url,
                    duration_ms = start.elapsed().as_millis() as u64,
                    body_len = body.len(),
                    "Page fetched"
                );
                Some(body)
            }
            Err(e) => {
                warn!(
                    subsystem = "extract",
                    component = "fetcher",
                    op = "fetch",
                    url,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Page fetch failed"
                );
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::remote(status.as_u16(), status.to_string()));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read body: {}", e)))
    }
}
