//! Network log handlers.

use crate::server::AppState;
use serde_json::{json, Value};

pub async fn get_network_logs(state: &AppState, _params: &Value) -> netlab_core::Result<Value> {
    Ok(serde_json::to_value(state.lab.recent_logs())?)
}

pub async fn clear_network_logs(state: &AppState, _params: &Value) -> netlab_core::Result<Value> {
    state.lab.clear_logs();
    Ok(json!({"cleared": true}))
}
