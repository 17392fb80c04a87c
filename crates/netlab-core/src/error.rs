//! Error types for netlab.
//!
//! Every failure the HTTP wrapper observes is classified into exactly one
//! variant here, and the same variant is what the caller receives back.

use thiserror::Error;

/// Main error type for the netlab library.
#[derive(Debug, Error)]
pub enum NetlabError {
    // Request lifecycle failures
    #[error("Request cancelled")]
    Cancelled,

    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request failed with status code {status}")]
    Status { status: u16, url: String },

    #[error("Network Error")]
    Network {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Simulated network failure")]
    SimulatedFailure,

    // Orchestration errors
    #[error("A retry run is already in progress")]
    RetryInProgress,

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for netlab operations.
pub type Result<T> = std::result::Result<T, NetlabError>;

impl From<serde_json::Error> for NetlabError {
    fn from(err: serde_json::Error) -> Self {
        NetlabError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl NetlabError {
    /// Classify a transport error raised while talking to `url`.
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            NetlabError::Timeout {
                url: url.to_string(),
                source: Some(err),
            }
        } else if let Some(status) = err.status() {
            NetlabError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else if err.is_decode() {
            NetlabError::Json {
                message: format!("Failed to decode response from {}: {}", url, err),
                source: None,
            }
        } else {
            NetlabError::Network {
                url: url.to_string(),
                source: Some(err),
            }
        }
    }

    /// Text recorded in the network log when a request to `path` fails this way.
    pub fn log_message(&self, path: &str) -> String {
        match self {
            NetlabError::Cancelled => "Request cancelled".to_string(),
            NetlabError::Timeout { .. } => format!("Timeout: {}", path),
            NetlabError::Status { status, .. } => format!("{} {}", status, path),
            _ => format!("Network Error {}", path),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32000: Network/connectivity error
    /// - -32001: Upstream answered with an error status
    /// - -32004: Cancelled by caller
    /// - -32005: Validation error
    /// - -32009: Conflicting operation in progress
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            NetlabError::Network { .. }
            | NetlabError::Timeout { .. }
            | NetlabError::SimulatedFailure => -32000,

            NetlabError::Status { .. } => -32001,

            NetlabError::Cancelled => -32004,

            NetlabError::InvalidParams { .. } | NetlabError::Config { .. } => -32005,

            NetlabError::RetryInProgress => -32009,

            _ => -32603,
        }
    }
}
