//! Configuration module
//!
//! Credentials and endpoints for the records service, loaded once from
//! the environment at startup and immutable afterwards. Required values
//! that are absent fail here, before any network call.

use std::env;
use std::time::Duration;

use crate::error::UploadError;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Immutable client configuration, constant for the process lifetime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Records service base URL, without trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub user_id: String,
    pub business_id: String,
    /// Storage access key id forwarded into the credential scope.
    pub access_key_id: Option<String>,
    /// Per-call timeout for every HTTP request.
    pub request_timeout: Duration,
    /// Override for the storage form POST endpoint (S3-compatible
    /// providers); public URLs always use the canonical bucket host.
    pub storage_endpoint: Option<String>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
        business_id: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            user_id: user_id.into(),
            business_id: business_id.into(),
            access_key_id: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            storage_endpoint: None,
        }
    }

    /// Load configuration from the environment (reads `.env` first).
    ///
    /// Required: MEDIALINK_API_URL, MEDIALINK_API_KEY, MEDIALINK_USER_ID,
    /// MEDIALINK_BUSINESS_ID. Optional: MEDIALINK_AWS_ACCESS_KEY_ID,
    /// MEDIALINK_REQUEST_TIMEOUT_SECS, MEDIALINK_STORAGE_ENDPOINT.
    pub fn from_env() -> Result<Self, UploadError> {
        dotenvy::dotenv().ok();

        let require = |name: &str| -> Result<String, UploadError> {
            env::var(name).map_err(|_| UploadError::ConfigurationMissing(name.to_string()))
        };

        let mut config = Self::new(
            require("MEDIALINK_API_URL")?,
            require("MEDIALINK_API_KEY")?,
            require("MEDIALINK_USER_ID")?,
            require("MEDIALINK_BUSINESS_ID")?,
        );

        config.access_key_id = env::var("MEDIALINK_AWS_ACCESS_KEY_ID")
            .ok()
            .filter(|s| !s.is_empty());

        config.request_timeout = env::var("MEDIALINK_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.request_timeout);

        config.storage_endpoint = env::var("MEDIALINK_STORAGE_ENDPOINT")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(config)
    }
}
