//! netlab core - headless network-resilience toolkit.
//!
//! This crate provides a logged HTTP client, a fixed-capacity network log and
//! a retry orchestrator with exponential backoff. It can be used
//! programmatically without any RPC layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use netlab_core::{CancellationToken, ClientConfig, NetLab};
//!
//! #[tokio::main]
//! async fn main() -> netlab_core::Result<()> {
//!     let lab = NetLab::new(ClientConfig::from_env())?;
//!
//!     let posts = lab.list_posts(10).await?;
//!     println!("Fetched {} posts", posts.len());
//!
//!     let report = lab.run_retry(3, &CancellationToken::new()).await?;
//!     println!("Retry run ended {:?}", report.outcome);
//!
//!     for entry in lab.recent_logs() {
//!         println!("#{} [{}] {}", entry.id, entry.kind, entry.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod models;
pub mod network;

mod api;

pub use api::NetLabBuilder;
pub use cancel::{CancellationToken, CancelledError};
pub use config::{ClientConfig, NetworkConfig};
pub use error::{NetlabError, Result};
pub use models::{NewPost, Page, Post, TimedFetch};
pub use network::{
    ApiClient, AttemptLog, AttemptStatus, LogEntry, LogKind, NetworkLog, RetryConfig,
    RetryReport, RunOutcome, RunState,
};

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Main entry point for netlab operations.
///
/// Owns one network log, the client that writes to it, and the state of the
/// retry demo. Share it behind an `Arc` to use it from several tasks.
pub struct NetLab {
    client: ApiClient,
    log: Arc<NetworkLog>,
    retry_config: RetryConfig,
    retry_state: Arc<watch::Sender<RunState>>,
    /// Held for the duration of a retry run.
    retry_lock: Arc<Mutex<()>>,
}

impl NetLab {
    /// Create an instance with default log capacity and retry settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        NetLabBuilder::new(config).build()
    }

    /// Create an instance configured from `NETLAB_API_BASE_URL` / `NETLAB_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Start building an instance with custom settings.
    pub fn builder(config: ClientConfig) -> NetLabBuilder {
        NetLabBuilder::new(config)
    }

    /// The network log shared with the client.
    pub fn network_log(&self) -> &Arc<NetworkLog> {
        &self.log
    }

    /// Recent network events, newest first.
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.log.snapshot()
    }

    pub fn clear_logs(&self) {
        self.log.clear();
    }
}
