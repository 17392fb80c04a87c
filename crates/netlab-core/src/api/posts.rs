//! Post listing, creation, pagination and timeout demo on NetLab.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::models::{NewPost, Page, Post, TimedFetch};
use crate::network::ApiRequest;
use crate::{NetLab, NetlabError, Result};

impl NetLab {
    /// Fetch the first `limit` posts.
    pub async fn list_posts(&self, limit: u32) -> Result<Vec<Post>> {
        let request = ApiRequest::get("/posts").query("_limit", limit);
        self.client
            .fetch_json(request, &CancellationToken::new())
            .await
    }

    /// Create a post and return the server's copy.
    pub async fn create_post(&self, post: &NewPost) -> Result<Post> {
        let request = ApiRequest::post("/posts").json(post)?;
        self.client
            .fetch_json(request, &CancellationToken::new())
            .await
    }

    /// Fetch `limit` posts starting at offset `start`.
    pub async fn fetch_page(&self, start: u32, limit: u32) -> Result<Page<Post>> {
        if limit == 0 {
            return Err(NetlabError::InvalidParams {
                message: "limit must be greater than zero".to_string(),
            });
        }

        let request = ApiRequest::get("/posts")
            .query("_start", start)
            .query("_limit", limit);
        let items: Vec<Post> = self
            .client
            .fetch_json(request, &CancellationToken::new())
            .await?;

        let page = Page::new(start, limit, items);
        debug!(
            "Fetched page start={} items={} has_more={}",
            start,
            page.items.len(),
            page.has_more
        );
        Ok(page)
    }

    /// Fetch a single post under `timeout` and report how long it took.
    ///
    /// Failures are part of the report rather than an error.
    pub async fn fetch_with_timeout(&self, timeout: Duration) -> TimedFetch {
        let started = Instant::now();
        let result: Result<Post> = self
            .client
            .fetch_json(
                ApiRequest::get("/posts/1").timeout(timeout),
                &CancellationToken::new(),
            )
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let timeout_ms = timeout.as_millis() as u64;

        match result {
            Ok(post) => TimedFetch {
                success: true,
                message: format!("Post: \"{}\"", post.title),
                elapsed_ms,
                timeout_ms,
                timed_out: false,
            },
            Err(NetlabError::Timeout { .. }) => TimedFetch {
                success: false,
                message: format!("Request timed out after {}ms", timeout_ms),
                elapsed_ms,
                timeout_ms,
                timed_out: true,
            },
            Err(e) => TimedFetch {
                success: false,
                message: e.to_string(),
                elapsed_ms,
                timeout_ms,
                timed_out: false,
            },
        }
    }
}
