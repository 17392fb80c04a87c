//! Centralized configuration for netlab.
//!
//! Constants for the network demo plus the client configuration, which can be
//! read from the process environment.

use crate::{NetlabError, Result};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://jsonplaceholder.typicode.com";
    pub const BASE_URL_ENV: &'static str = "NETLAB_API_BASE_URL";
    pub const TOKEN_ENV: &'static str = "NETLAB_API_TOKEN";
    pub const USER_AGENT: &'static str = "netlab/0.1";

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    pub const TIMEOUT_OPTIONS: [Duration; 3] = [
        Duration::from_millis(500),
        Duration::from_millis(2000),
        Duration::from_millis(10000),
    ];

    pub const LOG_CAPACITY: usize = 50;

    pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
    pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);
    pub const MAX_RETRY_CHOICES: u32 = 3;
    pub const SIMULATED_FAILURE_CAP: u32 = 2;

    pub const DEFAULT_PAGE_SIZE: u32 = 10;
}

/// Configuration for [`ApiClient`](crate::network::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Bearer token sent as `Authorization` when present.
    pub token: Option<String>,
    /// Default timeout for requests.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: NetworkConfig::DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read base URL and token from the environment.
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = non_empty_env(NetworkConfig::BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config.token = non_empty_env(NetworkConfig::TOKEN_ENV);
        config
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| NetlabError::Config {
            message: format!("Invalid base URL '{}': {}", self.base_url, e),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(NetlabError::Config {
                message: format!("Unsupported URL scheme '{}'", other),
            }),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
