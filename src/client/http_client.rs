//! [`HttpCatalogClient`]: listing and health over the HTTP surface.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::types::{HealthResponse, PackList};
use crate::{PackError, Result};

/// HTTP client for a remote packd instance.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    http: Client,
}

impl HttpCatalogClient {
    /// Client for the server at `base_url` (e.g. `http://127.0.0.1:8005`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, Client::new())
    }

    /// Client reusing an existing `reqwest` client.
    pub fn with_http_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every pack summary in the catalog.
    pub async fn list_packs(&self) -> Result<PackList> {
        self.get_json("/packs").await
    }

    /// Service health.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_json("/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PackError::Transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PackError::Rpc {
                code: status.as_u16().to_string(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PackError::Transport(format!("failed to read response from {url}: {e}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpCatalogClient::new("http://localhost:8005/");
        assert_eq!(client.base_url(), "http://localhost:8005");
    }
}
