//! Retry-with-backoff demo on NetLab.

use std::sync::Arc;
use tokio::sync::{watch, OwnedMutexGuard};
use tokio::task::JoinHandle;

use crate::cancel::CancellationToken;
use crate::config::NetworkConfig;
use crate::models::Post;
use crate::network::{ApiRequest, RetryOrchestrator, RetryReport, RunState, SimulatedFailures};
use crate::{NetLab, NetlabError, Result};

impl NetLab {
    /// Run the retry demo against `GET /posts/1`.
    ///
    /// The first `min(max_retries, 2)` attempts fail without touching the
    /// network; later attempts make the real request. Only one run may be
    /// active at a time. An exhausted run is returned as a normal report.
    pub async fn run_retry(
        &self,
        max_retries: u32,
        token: &CancellationToken,
    ) -> Result<RetryReport> {
        let _running = self.claim_retry(max_retries)?;
        Ok(self.drive_retry(max_retries, token).await)
    }

    /// Start a retry run in the background.
    ///
    /// Validation and the single-run check happen before this returns, and
    /// the published state already belongs to the new run.
    pub fn spawn_retry(
        self: &Arc<Self>,
        max_retries: u32,
        token: CancellationToken,
    ) -> Result<JoinHandle<RetryReport>> {
        let running = self.claim_retry(max_retries)?;
        let lab = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let _running = running;
            lab.drive_retry(max_retries, &token).await
        }))
    }

    /// State of the current or most recent retry run.
    pub fn retry_state(&self) -> RunState {
        self.retry_state.borrow().clone()
    }

    /// Watch retry state transitions.
    pub fn subscribe_retry(&self) -> watch::Receiver<RunState> {
        self.retry_state.subscribe()
    }

    pub fn is_retry_running(&self) -> bool {
        self.retry_state.borrow().is_running()
    }

    /// Validate `max_retries`, take the run lock and discard the previous run's state.
    fn claim_retry(&self, max_retries: u32) -> Result<OwnedMutexGuard<()>> {
        if !(1..=NetworkConfig::MAX_RETRY_CHOICES).contains(&max_retries) {
            return Err(NetlabError::InvalidParams {
                message: format!(
                    "max_retries must be between 1 and {}, got {}",
                    NetworkConfig::MAX_RETRY_CHOICES,
                    max_retries
                ),
            });
        }

        let guard = Arc::clone(&self.retry_lock)
            .try_lock_owned()
            .map_err(|_| NetlabError::RetryInProgress)?;
        self.retry_state.send_replace(RunState::Running {
            attempts: Vec::new(),
        });
        Ok(guard)
    }

    async fn drive_retry(&self, max_retries: u32, token: &CancellationToken) -> RetryReport {
        let config = self.retry_config.clone().with_max_retries(max_retries);
        let mut orchestrator = RetryOrchestrator::with_state(
            config,
            SimulatedFailures::for_retries(max_retries),
            self.retry_state.clone(),
        );

        let client = &self.client;
        orchestrator
            .run(
                |_| async move {
                    let post: Post = client
                        .fetch_json(ApiRequest::get("/posts/1"), token)
                        .await?;
                    Ok::<_, NetlabError>(format!("OK - \"{}\"", post.title))
                },
                token,
            )
            .await
    }
}
