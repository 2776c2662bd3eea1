use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::models::api::ProcessRequest;
use crate::models::job::Token;

/// Header carrying the pre-provisioned API key.
pub const API_KEY_HEADER: &str = "sampras-api-key";

/// Remote recognition service.
///
/// Both calls return the raw JSON body; interpreting `meta.code` and `data`
/// is left to the controllers. HTTP status codes are not inspected.
#[async_trait]
pub trait RecognitionApi: Send + Sync {
    /// `POST {base}/process` with both images.
    async fn process(&self, request: &ProcessRequest) -> Result<Value, ApiError>;

    /// `GET {base}/result/{token}`.
    async fn result(&self, token: &Token) -> Result<Value, ApiError>;
}

/// Per-request transport timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub upload: Duration,
    pub result: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            upload: Duration::from_millis(30_000),
            result: Duration::from_millis(3000),
        }
    }
}

/// HTTP client for the Sampras recognition API.
pub struct SamprasClient {
    http: Client,
    base_url: String,
    timeouts: RequestTimeouts,
}

impl SamprasClient {
    pub fn new(base_url: &str, api_key: &str, timeouts: RequestTimeouts) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| ApiError::Config("API key is not a valid header value".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        // gzip feature: advertises Accept-Encoding and decodes compressed bodies
        let http = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url(), &config.api_key, config.request_timeouts())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecognitionApi for SamprasClient {
    async fn process(&self, request: &ProcessRequest) -> Result<Value, ApiError> {
        let url = format!("{}/process", self.base_url);

        let response = self
            .http
            .post(&url)
            .timeout(self.timeouts.upload)
            .json(request)
            .send()
            .await?;
        tracing::debug!(status = %response.status(), "Upload response received");

        Ok(response.json().await?)
    }

    async fn result(&self, token: &Token) -> Result<Value, ApiError> {
        let url = format!("{}/result/{}", self.base_url, token);

        let response = self
            .http
            .get(&url)
            .timeout(self.timeouts.result)
            .send()
            .await?;
        tracing::debug!(status = %response.status(), token = %token, "Result response received");

        Ok(response.json().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Recognition service unavailable: {0}")]
    Unavailable(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client = SamprasClient::new("https://api.test/v1/", "key", RequestTimeouts::default()).unwrap();
        assert_eq!(client.base_url(), "https://api.test/v1");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let err = SamprasClient::new("https://api.test", "bad\nkey", RequestTimeouts::default())
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
