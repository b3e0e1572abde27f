//! Bearer token sources for the retrieval service
//!
//! Tokens are opaque here; caching them is the service's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SearchError};

/// Token endpoint of the compute metadata server
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Supplies access tokens for upstream calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Hands out a fixed token, typically from configuration.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl CredentialProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(SearchError::Credentials("no access token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}

/// Fetches the default service account's token from the metadata server.
#[derive(Debug, Clone)]
pub struct MetadataTokenProvider {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl MetadataTokenProvider {
    pub fn new() -> Result<Self> {
        Self::with_url(METADATA_TOKEN_URL)
    }

    /// Uses a token endpoint other than the standard metadata server.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(METADATA_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CredentialProvider for MetadataTokenProvider {
    async fn access_token(&self) -> Result<String> {
        debug!(url = %self.url, "Requesting access token from metadata server");

        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| SearchError::Credentials(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Credentials(format!(
                "metadata server returned {status}: {body}"
            )));
        }

        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| SearchError::Credentials(e.to_string()))?;
        Ok(token.access_token)
    }
}
