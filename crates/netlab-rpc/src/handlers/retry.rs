//! Retry demo handlers.
//!
//! `start_retry` returns as soon as the run is spawned; front-ends poll
//! `get_retry_state` and may abort with `cancel_retry`.

use super::get_u32_param;
use crate::server::{AppState, RetryTask};
use netlab_core::{CancellationToken, NetworkConfig};
use serde_json::{json, Value};

pub async fn start_retry(state: &AppState, params: &Value) -> netlab_core::Result<Value> {
    let max_retries = get_u32_param(params, "max_retries", "maxRetries")?
        .unwrap_or(NetworkConfig::MAX_RETRY_CHOICES);

    let mut slot = state.retry_task();
    let token = CancellationToken::new();
    let handle = state.lab.spawn_retry(max_retries, token.clone())?;
    *slot = Some(RetryTask { token, handle });

    Ok(json!({"started": true, "max_retries": max_retries}))
}

pub async fn get_retry_state(state: &AppState, _params: &Value) -> netlab_core::Result<Value> {
    Ok(serde_json::to_value(state.lab.retry_state())?)
}

pub async fn cancel_retry(state: &AppState, _params: &Value) -> netlab_core::Result<Value> {
    let slot = state.retry_task();
    let cancelled = match slot.as_ref() {
        Some(task) if !task.handle.is_finished() => {
            task.token.cancel();
            true
        }
        _ => false,
    };
    Ok(json!({"cancelled": cancelled}))
}
