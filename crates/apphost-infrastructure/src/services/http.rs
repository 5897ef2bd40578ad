//! Shared HTTP client

use std::time::Duration;

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, HttpClient};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::HttpConfig;
use crate::constants::HTTP_USER_AGENT;
use crate::error_ext::ErrorContext;

/// `reqwest`-backed client shared by core services and plugins
pub struct HttpClientManager {
    client: reqwest::Client,
    connection_limit: usize,
}

impl HttpClientManager {
    /// Build the client; the connection limit is raised to the host minimum
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let connection_limit = config.effective_connection_limit();
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(connection_limit)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(HTTP_USER_AGENT)
            .build()
            .network_context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            connection_limit,
        })
    }

    /// Connection limit applied to the client
    pub fn connection_limit(&self) -> usize {
        self.connection_limit
    }

    async fn fetch(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url, "HTTP GET");
        self.client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .network_context(format!("GET {url} failed"))
    }
}

impl Component for HttpClientManager {}

#[async_trait]
impl HttpClient for HttpClientManager {
    async fn get_string(&self, url: &str, cancellation: CancellationToken) -> Result<String> {
        tokio::select! {
            () = cancellation.cancelled() => Err(Error::cancelled(format!("GET {url}"))),
            response = self.fetch(url) => response?
                .text()
                .await
                .network_context(format!("Failed to read body of {url}")),
        }
    }

    async fn get_bytes(&self, url: &str, cancellation: CancellationToken) -> Result<Vec<u8>> {
        tokio::select! {
            () = cancellation.cancelled() => Err(Error::cancelled(format!("GET {url}"))),
            response = self.fetch(url) => response?
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .network_context(format!("Failed to read body of {url}")),
        }
    }
}
