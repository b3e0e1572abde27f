//! Outbound HTTP transport to the retrieval service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::Result;

/// Idle pooled connections are kept this long before being closed
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const POOL_MAX_IDLE_PER_HOST: usize = 10;
const TCP_KEEPALIVE: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Status and raw body of an upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends authorized JSON requests to the retrieval service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url` with `token` as the bearer credential.
    ///
    /// Non-success statuses are returned, not raised; only connection-level
    /// failures are errors.
    async fn post_json(&self, url: &str, token: &str, body: &Value) -> Result<UpstreamResponse>;
}

/// [`Transport`] over a pooled keep-alive `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .tcp_keepalive(TCP_KEEPALIVE)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, token: &str, body: &Value) -> Result<UpstreamResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    #[test]
    fn test_response_status_classes() {
        assert!(UpstreamResponse::new(200, "{}").is_ok());
        assert!(UpstreamResponse::new(204, "").is_ok());
        assert!(!UpstreamResponse::new(302, "").is_ok());
        assert!(!UpstreamResponse::new(503, "unavailable").is_ok());
    }

    #[test]
    fn test_response_json() {
        let response = UpstreamResponse::new(200, r#"{"totalSize": 3}"#);
        assert_eq!(response.json().unwrap()["totalSize"], 3);
        assert_eq!(response.text(), r#"{"totalSize": 3}"#);
    }

    #[test]
    fn test_response_invalid_json_is_decode_error() {
        let response = UpstreamResponse::new(200, "<html>");
        assert!(matches!(response.json(), Err(SearchError::Decode(_))));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
