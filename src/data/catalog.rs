//! HTTP transport for the remote catalog
//!
//! The catalog is fetched with a plain `GET <url>`: no headers, no query
//! construction, no timeout. The raw body text is returned so the hook can both
//! parse it and cache it verbatim.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Catalog endpoint used when no `--url` is given
pub const DEFAULT_CATALOG_URL: &str = "https://simple-grocery-store-api.online/products";

/// Errors that can occur when fetching the catalog
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Performs the catalog GET
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` and returns the response body as text
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Transport backed by a reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;

        // Non-2xx bodies are still handed to the parser
        let status = response.status();
        if status.is_success() {
            tracing::debug!(%url, %status, "catalog response");
        } else {
            tracing::warn!(%url, %status, "catalog responded with non-success status");
        }

        Ok(response.text().await?)
    }
}
