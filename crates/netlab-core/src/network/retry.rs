//! Retry orchestration with exponential backoff.
//!
//! Provides configurable retry behavior for network operations with:
//! - Exponential backoff (delay doubles each attempt)
//! - Optional jitter
//! - An injectable failure policy, kept apart from the backoff loop
//! - A per-attempt audit trail published as it changes
//! - Cancellation of in-flight attempts and backoff delays

use crate::cancel::CancellationToken;
use crate::config::NetworkConfig;
use crate::NetlabError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; a run makes at most `max_retries + 1` attempts.
    pub max_retries: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// Exponential base (2.0 for doubling).
    pub exponential_base: f64,
    /// Whether to add random jitter to delays.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: NetworkConfig::MAX_RETRY_CHOICES,
            base_delay: NetworkConfig::RETRY_BASE_DELAY,
            max_delay: NetworkConfig::RETRY_MAX_DELAY,
            exponential_base: 2.0,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts a run may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Without jitter this is `base_delay * exponential_base^(attempt - 1)`,
    /// capped at `max_delay`.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let multiplier = self.exponential_base.powi(exponent);
        let delay_secs = self.base_delay.as_secs_f64() * multiplier;
        let capped_secs = delay_secs.min(self.max_delay.as_secs_f64());

        let final_secs = if self.jitter {
            // Factor in [0.5, 1.5) keeps the mean delay unchanged.
            let mut rng = rand::rng();
            let jitter_factor = rng.random_range(0.5..1.5);
            (capped_secs * jitter_factor).min(self.max_delay.as_secs_f64())
        } else {
            capped_secs
        };

        Duration::from_secs_f64(final_secs)
    }
}

/// Decides whether an attempt fails before the real operation runs.
pub trait FailurePolicy: Send {
    /// Return a failure message to fail `attempt` without running the operation.
    fn inject_failure(&mut self, attempt: u32) -> Option<String>;

    /// Called at the start of every run.
    fn reset(&mut self) {}
}

/// Policy that never injects failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInjectedFailures;

impl FailurePolicy for NoInjectedFailures {
    fn inject_failure(&mut self, _attempt: u32) -> Option<String> {
        None
    }
}

/// Policy that fails the first `count` attempts of each run.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedFailures {
    count: u32,
    injected: u32,
}

impl SimulatedFailures {
    pub fn first(count: u32) -> Self {
        Self { count, injected: 0 }
    }

    /// The demo schedule: `min(max_retries, 2)` simulated failures.
    pub fn for_retries(max_retries: u32) -> Self {
        Self::first(max_retries.min(NetworkConfig::SIMULATED_FAILURE_CAP))
    }
}

impl FailurePolicy for SimulatedFailures {
    fn inject_failure(&mut self, _attempt: u32) -> Option<String> {
        if self.injected < self.count {
            self.injected += 1;
            Some(NetlabError::SimulatedFailure.to_string())
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.injected = 0;
    }
}

/// Status of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Pending,
    Success,
    Fail,
}

/// Audit record of one attempt within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptLog {
    pub id: u32,
    pub attempt_number: u32,
    pub status: AttemptStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AttemptLog {
    fn pending(attempt_number: u32) -> Self {
        Self {
            id: attempt_number,
            attempt_number,
            status: AttemptStatus::Pending,
            message: "Requesting...".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn resolve(&mut self, status: AttemptStatus, message: String) {
        debug_assert_eq!(self.status, AttemptStatus::Pending);
        self.status = status;
        self.message = message;
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// An attempt succeeded.
    Succeeded,
    /// Every allowed attempt failed.
    Exhausted,
    /// The caller cancelled the run.
    Cancelled,
}

/// Observable state of a retry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running {
        attempts: Vec<AttemptLog>,
    },
    Done {
        attempts: Vec<AttemptLog>,
        outcome: RunOutcome,
    },
}

impl RunState {
    pub fn attempts(&self) -> &[AttemptLog] {
        match self {
            RunState::Idle => &[],
            RunState::Running { attempts } | RunState::Done { attempts, .. } => attempts,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        match self {
            RunState::Done { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.attempts()
            .iter()
            .filter(|a| a.status == AttemptStatus::Pending)
            .count()
    }
}

/// Statistics about a retry run.
#[derive(Debug, Clone, Default)]
pub struct RetryStats {
    /// Number of attempts made.
    pub attempts: u32,
    /// Backoff delays actually waited, in order.
    pub delays: Vec<Duration>,
    /// Total delay accumulated.
    pub total_delay: Duration,
    /// Whether the run ultimately succeeded.
    pub success: bool,
    /// Last failure message.
    pub last_error: Option<String>,
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct RetryReport {
    pub attempts: Vec<AttemptLog>,
    pub outcome: RunOutcome,
    pub stats: RetryStats,
}

/// Drives sequential attempts with backoff and records each one.
pub struct RetryOrchestrator<P> {
    config: RetryConfig,
    policy: P,
    state: Arc<watch::Sender<RunState>>,
}

impl<P: FailurePolicy> RetryOrchestrator<P> {
    /// Create an orchestrator with its own state channel.
    pub fn new(config: RetryConfig, policy: P) -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self::with_state(config, policy, Arc::new(state))
    }

    /// Create an orchestrator that publishes into an existing state channel.
    pub fn with_state(config: RetryConfig, policy: P, state: Arc<watch::Sender<RunState>>) -> Self {
        Self {
            config,
            policy,
            state,
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Watch every state transition of this orchestrator's runs.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state.borrow().clone()
    }

    /// Run `operation` until it succeeds, the attempt budget is spent, or
    /// `token` is cancelled.
    ///
    /// `operation` receives the 1-based attempt number and returns a message
    /// describing the success. Attempts never overlap: the next one starts
    /// only after the previous one's status has been recorded.
    pub async fn run<F, Fut, E>(
        &mut self,
        mut operation: F,
        token: &CancellationToken,
    ) -> RetryReport
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: std::fmt::Display,
    {
        self.policy.reset();
        let max_attempts = self.config.max_attempts();
        let mut attempts: Vec<AttemptLog> = Vec::with_capacity(max_attempts as usize);
        let mut stats = RetryStats::default();
        let mut outcome = RunOutcome::Exhausted;

        self.publish_running(&attempts);

        for attempt in 1..=max_attempts {
            if token.is_cancelled() {
                outcome = RunOutcome::Cancelled;
                break;
            }

            stats.attempts = attempt;
            attempts.push(AttemptLog::pending(attempt));
            let current = attempts.len() - 1;
            self.publish_running(&attempts);

            let result = match self.policy.inject_failure(attempt) {
                Some(message) => Err(message),
                None => match token.run_until_cancelled(operation(attempt)).await {
                    Ok(Ok(message)) => Ok(message),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => {
                        attempts[current].resolve(AttemptStatus::Fail, "Cancelled".to_string());
                        stats.last_error = Some("Cancelled".to_string());
                        outcome = RunOutcome::Cancelled;
                        break;
                    }
                },
            };

            match result {
                Ok(message) => {
                    attempts[current].resolve(AttemptStatus::Success, message);
                    stats.success = true;
                    outcome = RunOutcome::Succeeded;
                    if attempt > 1 {
                        debug!("Operation succeeded after {} attempts", attempt);
                    }
                    break;
                }
                Err(message) => {
                    attempts[current].resolve(AttemptStatus::Fail, message.clone());
                    self.publish_running(&attempts);

                    if attempt >= max_attempts {
                        warn!(
                            "All {} attempts exhausted. Last error: {}",
                            max_attempts, message
                        );
                        stats.last_error = Some(message);
                        break;
                    }

                    let delay = self.config.calculate_delay(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, max_attempts, message, delay
                    );
                    stats.last_error = Some(message);

                    if token.sleep(delay).await.is_err() {
                        outcome = RunOutcome::Cancelled;
                        break;
                    }
                    stats.delays.push(delay);
                    stats.total_delay += delay;
                }
            }
        }

        info!(
            "Retry run finished: {:?} after {} attempt(s)",
            outcome, stats.attempts
        );
        self.state.send_replace(RunState::Done {
            attempts: attempts.clone(),
            outcome,
        });

        RetryReport {
            attempts,
            outcome,
            stats,
        }
    }

    fn publish_running(&self, attempts: &[AttemptLog]) {
        self.state.send_replace(RunState::Running {
            attempts: attempts.to_vec(),
        });
    }
}
