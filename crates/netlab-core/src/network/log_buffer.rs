//! Fixed-capacity, newest-first record of network events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::config::NetworkConfig;

/// Lifecycle point a log entry was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Request,
    Response,
    Error,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogKind::Request => write!(f, "request"),
            LogKind::Response => write!(f, "response"),
            LogKind::Error => write!(f, "error"),
        }
    }
}

/// A single captured network event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct LogState {
    next_id: u64,
    entries: VecDeque<LogEntry>,
}

/// Ring buffer of the most recent network events.
///
/// The newest entry sits at the front. Once `capacity` is exceeded the oldest
/// entry is dropped. Ids keep increasing across `clear()`.
#[derive(Debug)]
pub struct NetworkLog {
    capacity: usize,
    state: Mutex<LogState>,
}

impl Default for NetworkLog {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkLog {
    /// Create a buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(NetworkConfig::LOG_CAPACITY)
    }

    /// Create a buffer holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(LogState {
                next_id: 0,
                entries: VecDeque::with_capacity(capacity + 1),
            }),
        }
    }

    /// Record an event and return a copy of the stored entry.
    pub fn record(&self, kind: LogKind, message: impl Into<String>) -> LogEntry {
        let mut state = self.lock();
        state.next_id += 1;
        let entry = LogEntry {
            id: state.next_id,
            timestamp: Utc::now(),
            kind,
            message: message.into(),
        };
        state.entries.push_front(entry.clone());
        if state.entries.len() > self.capacity {
            state.entries.pop_back();
        }
        entry
    }

    /// Copy of the current entries, newest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
