//! Result of a fetch performed under an explicit timeout.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedFetch {
    pub success: bool,
    /// `Post: "<title>"` on success, otherwise the failure description.
    pub message: String,
    pub elapsed_ms: u64,
    pub timeout_ms: u64,
    pub timed_out: bool,
}
