//! Ephemeral, keyed status notifications that expire on their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// How long a status message stays visible
pub const STATUS_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub id: String,
    pub text: String,
    pub kind: StatusKind,
    pub posted_at: DateTime<Utc>,
}

/// What an expiry timer removes when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Remove only the message the timer was scheduled for. A replacement
    /// posted under the same id lives for its own full ttl.
    #[default]
    PerMessage,
    /// Remove whatever is displayed under the timer's id. A replacement may
    /// disappear before its own ttl when the earlier timer fires first.
    PerId,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusFeedConfig {
    pub ttl: Duration,
    pub expiry: ExpiryPolicy,
}

impl Default for StatusFeedConfig {
    fn default() -> Self {
        Self {
            ttl: STATUS_TTL,
            expiry: ExpiryPolicy::default(),
        }
    }
}

/// Insertion-ordered feed of live status messages
///
/// Cloning is cheap; clones share the same feed. Every `post` spawns its own
/// timer on the current Tokio runtime. Outside a runtime the message is still
/// shown but stays until it is replaced or dismissed.
#[derive(Clone)]
pub struct StatusFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    config: StatusFeedConfig,
    state: Mutex<FeedState>,
    revision: watch::Sender<u64>,
}

#[derive(Default)]
struct FeedState {
    entries: Vec<Entry>,
    next_serial: u64,
}

struct Entry {
    serial: u64,
    message: StatusMessage,
}

impl StatusFeed {
    pub fn new(config: StatusFeedConfig) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(FeedInner {
                config,
                state: Mutex::new(FeedState::default()),
                revision,
            }),
        }
    }

    pub fn config(&self) -> StatusFeedConfig {
        self.inner.config
    }

    /// Show a message under `id`, replacing any message already shown under it
    pub fn post(&self, text: impl Into<String>, kind: StatusKind, id: impl Into<String>) {
        let id = id.into();
        let message = StatusMessage {
            id: id.clone(),
            text: text.into(),
            kind,
            posted_at: Utc::now(),
        };

        let serial = {
            let mut state = self.inner.state();
            let serial = state.next_serial;
            state.next_serial += 1;
            state.entries.retain(|entry| entry.message.id != id);
            state.entries.push(Entry { serial, message });
            serial
        };
        self.inner.bump();

        tracing::debug!("Status '{}' posted ({:?})", id, kind);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No Tokio runtime; status '{}' will not expire on its own", id);
            return;
        };

        let feed: Weak<FeedInner> = Arc::downgrade(&self.inner);
        let deadline = tokio::time::Instant::now() + self.inner.config.ttl;
        runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The feed may be gone if its panel was unmounted
            if let Some(inner) = feed.upgrade() {
                inner.expire(&id, serial);
            }
        });
    }

    /// Remove the message shown under `id` right away
    pub fn dismiss(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.inner.state();
            let before = state.entries.len();
            state.entries.retain(|entry| entry.message.id != id);
            state.entries.len() != before
        };
        if removed {
            self.inner.bump();
        }
        removed
    }

    pub fn dismiss_all(&self) {
        let removed = {
            let mut state = self.inner.state();
            let had_entries = !state.entries.is_empty();
            state.entries.clear();
            had_entries
        };
        if removed {
            self.inner.bump();
        }
    }

    /// Live messages, oldest first
    pub fn entries(&self) -> Vec<StatusMessage> {
        self.inner
            .state()
            .entries
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<StatusMessage> {
        self.inner
            .state()
            .entries
            .iter()
            .find(|entry| entry.message.id == id)
            .map(|entry| entry.message.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state().entries.is_empty()
    }

    /// Receiver that changes whenever the set of live messages changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new(StatusFeedConfig::default())
    }
}

impl std::fmt::Debug for StatusFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusFeed")
            .field("config", &self.inner.config)
            .field("entries", &self.entries())
            .finish()
    }
}

impl FeedInner {
    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn expire(&self, id: &str, serial: u64) {
        let removed = {
            let mut state = self.state();
            let before = state.entries.len();
            match self.config.expiry {
                ExpiryPolicy::PerMessage => state.entries.retain(|entry| entry.serial != serial),
                ExpiryPolicy::PerId => state.entries.retain(|entry| entry.message.id != id),
            }
            state.entries.len() != before
        };

        if removed {
            tracing::debug!("Status '{}' expired", id);
            self.bump();
        }
    }
}
