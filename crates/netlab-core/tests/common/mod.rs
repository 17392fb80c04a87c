//! Local stand-in for the posts API used by the integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TOTAL_POSTS: u64 = 100;

/// Knobs and counters shared with the stub's handlers.
#[derive(Clone, Default)]
pub struct StubState {
    /// Calls to `GET /posts/:id`.
    pub post_hits: Arc<AtomicU32>,
    /// Remaining `GET /posts/:id` calls that answer 503.
    pub fail_next: Arc<AtomicU32>,
    /// Delay applied to `GET /posts/:id`.
    pub delay_ms: Arc<AtomicU64>,
}

pub struct StubServer {
    pub base_url: String,
    pub state: StubState,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the stub on an ephemeral loopback port.
pub async fn start_stub() -> StubServer {
    let state = StubState::default();
    let app = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(get_post))
        .route("/slow", get(slow))
        .route("/whoami", get(whoami))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubServer {
        base_url: format!("http://{}", addr),
        state,
        handle,
    }
}

fn post_json(id: u64) -> Value {
    json!({
        "userId": (id - 1) / 10 + 1,
        "id": id,
        "title": format!("Post {}", id),
        "body": format!("Body of post {}", id),
    })
}

async fn list_posts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let start: u64 = params
        .get("_start")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: u64 = params
        .get("_limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(TOTAL_POSTS);
    let end = (start + limit).min(TOTAL_POSTS);
    let posts: Vec<Value> = (start + 1..=end).map(post_json).collect();
    Json(Value::Array(posts))
}

async fn get_post(
    State(state): State<StubState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    state.post_hits.fetch_add(1, Ordering::SeqCst);

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let should_fail = state
        .fail_next
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if should_fail {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    if id == 0 || id > TOTAL_POSTS {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(post_json(id)))
}

async fn create_post(Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("id".to_string(), json!(TOTAL_POSTS + 1));
    }
    (StatusCode::CREATED, Json(body))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "late"
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    Json(json!({
        "authorization": authorization,
        "contentType": content_type,
    }))
}
