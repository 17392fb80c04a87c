//! HTTP client that records every request in a [`NetworkLog`].
//!
//! Provides a wrapper around reqwest with:
//! - One `request` entry and exactly one `response`/`error` entry per call
//! - Bearer token injection
//! - Per-request timeout override
//! - Cooperative cancellation of in-flight requests

use crate::cancel::CancellationToken;
use crate::config::{ClientConfig, NetworkConfig};
use crate::network::log_buffer::{LogKind, NetworkLog};
use crate::{NetlabError, Result};
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A request relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path appended to the base URL, also used verbatim in log messages.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client with lifecycle logging.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    log: Arc<NetworkLog>,
}

impl ApiClient {
    /// Create a client for `config` that writes to `log`.
    pub fn new(config: &ClientConfig, log: Arc<NetworkLog>) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| NetlabError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            log,
        })
    }

    /// The log this client records into.
    pub fn log(&self) -> &Arc<NetworkLog> {
        &self.log
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.clone()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(ApiRequest::get(path)).await
    }

    /// Make a GET request with a timeout other than the default.
    pub async fn get_with_timeout(&self, path: &str, timeout: Duration) -> Result<Response> {
        self.send(ApiRequest::get(path).timeout(timeout)).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// Send a request and decode its JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        token: &CancellationToken,
    ) -> Result<T> {
        let url = self.url_for(&request.path);
        let response = self.send_cancellable(request, token).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| NetlabError::from_reqwest(e, &url))
    }

    /// GET `path` and decode its JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_json(ApiRequest::get(path), &CancellationToken::new())
            .await
    }

    /// Send a request that cannot be cancelled.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        self.send_cancellable(request, &CancellationToken::new())
            .await
    }

    /// Send a request, aborting it if `token` is cancelled.
    ///
    /// Non-2xx responses are returned as [`NetlabError::Status`]. Every
    /// failure is logged and then handed back unchanged.
    pub async fn send_cancellable(
        &self,
        request: ApiRequest,
        token: &CancellationToken,
    ) -> Result<Response> {
        let path = request.path.as_str();
        let url = self.url_for(path);

        let mut entry = TerminalEntry::open(&self.log, &request.method, path);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(bearer) = &self.token {
            builder = builder.bearer_auth(bearer);
        }

        let outcome = match token.run_until_cancelled(builder.send()).await {
            Err(cancelled) => Err(NetlabError::from(cancelled)),
            Ok(Ok(response)) if response.status().is_success() => Ok(response),
            Ok(Ok(response)) => Err(NetlabError::Status {
                status: response.status().as_u16(),
                url: url.clone(),
            }),
            Ok(Err(e)) => Err(NetlabError::from_reqwest(e, &url)),
        };

        match outcome {
            Ok(response) => {
                entry.close(
                    LogKind::Response,
                    format!("{} {}", response.status().as_u16(), path),
                );
                Ok(response)
            }
            Err(err) => {
                let message = err.log_message(path);
                warn!("{} {} failed: {}", request.method, url, message);
                entry.close(LogKind::Error, message);
                Err(err)
            }
        }
    }
}

/// Pairs a `request` entry with exactly one terminal entry.
///
/// If the request future is dropped before it completes, the drop records
/// the cancellation.
struct TerminalEntry<'a> {
    log: &'a NetworkLog,
    open: bool,
}

impl<'a> TerminalEntry<'a> {
    fn open(log: &'a NetworkLog, method: &Method, path: &str) -> Self {
        log.record(LogKind::Request, format!("{} {}", method, path));
        Self { log, open: true }
    }

    fn close(&mut self, kind: LogKind, message: String) {
        if std::mem::replace(&mut self.open, false) {
            self.log.record(kind, message);
        }
    }
}

impl Drop for TerminalEntry<'_> {
    fn drop(&mut self) {
        self.close(LogKind::Error, NetlabError::Cancelled.log_message(""));
    }
}
