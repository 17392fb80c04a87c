//! Post resources served by the demo endpoint.

use serde::{Deserialize, Serialize};

/// A post as returned by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Payload for `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

impl Default for NewPost {
    fn default() -> Self {
        Self {
            title: "Demo Post Title".to_string(),
            body: "This post was created from the netlab demo.".to_string(),
            user_id: 1,
        }
    }
}

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub start: u32,
    pub limit: u32,
    pub items: Vec<T>,
    /// False once a page comes back shorter than `limit`.
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(start: u32, limit: u32, items: Vec<T>) -> Self {
        let has_more = items.len() >= limit as usize && limit > 0;
        Self {
            start,
            limit,
            items,
            has_more,
        }
    }

    /// Offset of the page that follows this one.
    pub fn next_start(&self) -> u32 {
        let fetched = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        self.start.saturating_add(fetched)
    }
}
