//! HTTP client for the remote catalog endpoint.

use super::models::RemoteCatalogDocument;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// The published catalog document fetched when no URL override is given.
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/littleLemonSimpleMenu.json";

/// Errors that can occur while fetching the catalog.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or connection failure, including non-success statuses.
    #[error("network error fetching catalog: {0}")]
    Network(#[from] reqwest::Error),

    /// Payload does not match the expected document shape or contains
    /// invalid field values.
    #[error("malformed catalog document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Trait for remote catalog sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and decode the full catalog document. One attempt per call;
    /// retry policy is the caller's concern.
    async fn fetch_catalog(&self) -> Result<RemoteCatalogDocument, FetchError>;
}

/// Catalog source backed by a single HTTPS GET to a fixed endpoint.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpCatalogSource {
    /// Create a new catalog source.
    ///
    /// # Arguments
    /// * `endpoint_url` - URL of the catalog document
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(endpoint_url: impl Into<String>, timeout_sec: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.into(),
        })
    }

    /// Get the configured endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<RemoteCatalogDocument, FetchError> {
        let response = self
            .client
            .get(&self.endpoint_url)
            .send()
            .await?
            .error_for_status()?;

        // The published document is served as text/plain, so decode the
        // body text rather than using the content-type gated json() helper.
        let body = response.text().await?;
        let document: RemoteCatalogDocument = serde_json::from_str(&body)?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_creation() {
        let source = HttpCatalogSource::new("http://localhost:8080/menu.json", 30).unwrap();
        assert_eq!(source.endpoint_url(), "http://localhost:8080/menu.json");
    }

    #[test]
    fn test_default_url_uses_https() {
        assert!(DEFAULT_CATALOG_URL.starts_with("https://"));
    }
}
