//! Post, pagination and timeout handlers.

use super::{get_str_param, get_u32_param};
use crate::server::AppState;
use netlab_core::{NetworkConfig, NewPost};
use serde_json::Value;
use std::time::Duration;

pub async fn list_posts(state: &AppState, params: &Value) -> netlab_core::Result<Value> {
    let limit =
        get_u32_param(params, "limit", "limit")?.unwrap_or(NetworkConfig::DEFAULT_PAGE_SIZE);
    let posts = state.lab.list_posts(limit).await?;
    Ok(serde_json::to_value(posts)?)
}

pub async fn create_post(state: &AppState, params: &Value) -> netlab_core::Result<Value> {
    let defaults = NewPost::default();
    let post = NewPost {
        title: get_str_param(params, "title", "title")
            .map(String::from)
            .unwrap_or(defaults.title),
        body: get_str_param(params, "body", "body")
            .map(String::from)
            .unwrap_or(defaults.body),
        user_id: get_u32_param(params, "user_id", "userId")?
            .map(u64::from)
            .unwrap_or(defaults.user_id),
    };
    let created = state.lab.create_post(&post).await?;
    Ok(serde_json::to_value(created)?)
}

pub async fn fetch_page(state: &AppState, params: &Value) -> netlab_core::Result<Value> {
    let start = get_u32_param(params, "start", "start")?.unwrap_or(0);
    let limit =
        get_u32_param(params, "limit", "limit")?.unwrap_or(NetworkConfig::DEFAULT_PAGE_SIZE);
    let page = state.lab.fetch_page(start, limit).await?;
    Ok(serde_json::to_value(page)?)
}

pub async fn fetch_with_timeout(state: &AppState, params: &Value) -> netlab_core::Result<Value> {
    let timeout = get_u32_param(params, "timeout_ms", "timeoutMs")?
        .map(|ms| Duration::from_millis(u64::from(ms)))
        .unwrap_or(NetworkConfig::TIMEOUT_OPTIONS[1]);
    let report = state.lab.fetch_with_timeout(timeout).await;
    Ok(serde_json::to_value(report)?)
}
