use std::time::Duration;

use garde::Validate;
use serde::Deserialize;

use crate::services::poller::PollPolicy;
use crate::services::recognition::RequestTimeouts;

#[derive(Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Base URL of the recognition API (e.g., "https://api.example.com/v1").
    #[garde(length(min = 1))]
    pub api_url: String,

    /// Pre-provisioned key sent as the `sampras-api-key` header
    #[garde(length(min = 1))]
    pub api_key: String,

    /// Custom identifier attached to every upload
    #[serde(default = "default_custom_id")]
    #[garde(length(min = 1, max = 200))]
    pub custom_id: String,

    /// Retries allowed while a result is pending (initial attempt not counted)
    #[serde(default = "default_max_retries")]
    #[garde(range(max = 20))]
    pub max_retries: u32,

    /// Fixed delay between result polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    #[garde(range(min = 1))]
    pub poll_interval_ms: u64,

    /// Transport timeout for the upload request, in milliseconds
    #[serde(default = "default_upload_timeout_ms")]
    #[garde(range(min = 1))]
    pub upload_timeout_ms: u64,

    /// Transport timeout for a single result request, in milliseconds
    #[serde(default = "default_result_timeout_ms")]
    #[garde(range(min = 1))]
    pub result_timeout_ms: u64,

    /// Local control surface bind address (e.g., "127.0.0.1:3000")
    #[serde(default = "default_bind_addr")]
    #[garde(length(min = 1))]
    pub bind_addr: String,
}

fn default_custom_id() -> String {
    "tester".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_upload_timeout_ms() -> u64 {
    30_000
}

fn default_result_timeout_ms() -> u64 {
    3000
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            max_retries: self.max_retries,
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn request_timeouts(&self) -> RequestTimeouts {
        RequestTimeouts {
            upload: Duration::from_millis(self.upload_timeout_ms),
            result: Duration::from_millis(self.result_timeout_ms),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] garde::Report),
}
