//! Network utilities: logged HTTP calls and retries.
//!
//! This module provides:
//! - A fixed-capacity ring buffer of request/response/error events
//! - An HTTP client that records every call into that buffer
//! - A retry orchestrator with exponential backoff and cancellation

mod client;
mod log_buffer;
mod retry;

pub use client::{ApiClient, ApiRequest};
pub use log_buffer::{LogEntry, LogKind, NetworkLog};
pub use retry::{
    AttemptLog, AttemptStatus, FailurePolicy, NoInjectedFailures, RetryConfig, RetryOrchestrator,
    RetryReport, RetryStats, RunOutcome, RunState, SimulatedFailures,
};
