//! HTTP server implementation using Axum.

use crate::handlers::{handle_health, handle_rpc};
use axum::{
    routing::{get, post},
    Router,
};
use netlab_core::{CancellationToken, NetLab, RetryReport};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Background retry run spawned by `start_retry`.
pub struct RetryTask {
    pub token: CancellationToken,
    pub handle: JoinHandle<RetryReport>,
}

/// Application state shared across handlers.
pub struct AppState {
    pub lab: Arc<NetLab>,
    retry_task: Mutex<Option<RetryTask>>,
}

impl AppState {
    pub fn new(lab: NetLab) -> Self {
        Self {
            lab: Arc::new(lab),
            retry_task: Mutex::new(None),
        }
    }

    /// Slot holding the most recent retry run.
    pub fn retry_task(&self) -> MutexGuard<'_, Option<RetryTask>> {
        self.retry_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Build the router for `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/rpc", post(handle_rpc))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the JSON-RPC HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(lab: NetLab, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let state = Arc::new(AppState::new(lab));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
