//! Builder for [`NetLab`] instances.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

use crate::config::{ClientConfig, NetworkConfig};
use crate::network::{ApiClient, NetworkLog, RetryConfig, RunState};
use crate::{NetLab, Result};

/// Builder for creating [`NetLab`] instances.
///
/// # Example
///
/// ```rust,ignore
/// let lab = NetLab::builder(ClientConfig::new("http://127.0.0.1:3000"))
///     .log_capacity(100)
///     .retry_base_delay(Duration::from_millis(50))
///     .build()?;
/// ```
pub struct NetLabBuilder {
    client_config: ClientConfig,
    log_capacity: usize,
    retry_config: RetryConfig,
}

impl NetLabBuilder {
    pub fn new(client_config: ClientConfig) -> Self {
        Self {
            client_config,
            log_capacity: NetworkConfig::LOG_CAPACITY,
            retry_config: RetryConfig::default(),
        }
    }

    /// Number of events the network log keeps.
    ///
    /// Default: 50
    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Delay after the first failed retry attempt.
    ///
    /// Default: 500ms
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_config.base_delay = delay;
        self
    }

    /// Build the NetLab instance.
    pub fn build(self) -> Result<NetLab> {
        let log = Arc::new(NetworkLog::with_capacity(self.log_capacity));
        let client = ApiClient::new(&self.client_config, log.clone())?;
        let (retry_state, _) = watch::channel(RunState::Idle);

        tracing::debug!(
            "netlab ready: base_url={}, log_capacity={}",
            self.client_config.base_url,
            log.capacity()
        );

        Ok(NetLab {
            client,
            log,
            retry_config: self.retry_config,
            retry_state: Arc::new(retry_state),
            retry_lock: Arc::new(Mutex::new(())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_applies_settings() {
        let lab = NetLab::builder(ClientConfig::new("http://127.0.0.1:9"))
            .log_capacity(7)
            .retry_base_delay(Duration::from_millis(20))
            .build()
            .unwrap();

        assert_eq!(lab.network_log().capacity(), 7);
        assert_eq!(lab.retry_config.base_delay, Duration::from_millis(20));
        assert_eq!(lab.retry_state(), RunState::Idle);
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        assert!(NetLab::builder(ClientConfig::new("nope")).build().is_err());
    }
}
