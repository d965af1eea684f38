//! Process-wide view of the active browser tab.

use crate::gateway::BrowserTabs;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// The active tab as last observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabContext {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TabContext {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
            title: None,
        }
    }
}

/// Browser events that may change which tab is active or where it points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    /// The user switched to another tab
    Activated { tab_id: String },
    /// A tab changed; `complete` is set once its navigation finished loading
    Updated { tab_id: String, complete: bool },
}

/// Shared, always-fresh tab context
///
/// Actions read [`TabTracker::current`] at the moment they run; nothing
/// snapshots the tab when a panel is mounted.
#[derive(Clone)]
pub struct TabTracker {
    tabs: Arc<dyn BrowserTabs>,
    current: Arc<watch::Sender<Option<TabContext>>>,
    issued: Arc<AtomicU64>,
}

impl TabTracker {
    pub fn new(tabs: Arc<dyn BrowserTabs>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            tabs,
            current: Arc::new(current),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn current(&self) -> Option<TabContext> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TabContext>> {
        self.current.subscribe()
    }

    /// Re-resolve the active tab
    ///
    /// When refreshes overlap only the most recently started one is applied.
    /// A failed lookup keeps the previous context.
    pub async fn refresh(&self) -> Option<TabContext> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        match self.tabs.active_tab().await {
            Ok(tab) => {
                if self.issued.load(Ordering::SeqCst) == ticket {
                    tracing::debug!("Active tab: {:?}", tab.as_ref().map(|t| &t.url));
                    self.current.send_replace(tab);
                } else {
                    tracing::debug!("Discarding stale tab lookup");
                }
            }
            Err(e) => {
                tracing::warn!("Could not resolve active tab: {}", e);
            }
        }

        self.current()
    }

    /// Refresh on activation and on completed navigation; ignore the rest
    pub async fn handle(&self, event: &TabEvent) -> bool {
        match event {
            TabEvent::Activated { .. } | TabEvent::Updated { complete: true, .. } => {
                self.refresh().await;
                true
            }
            TabEvent::Updated { complete: false, .. } => false,
        }
    }

    /// Drive refreshes from an event stream until it closes
    pub fn listen(&self, mut events: mpsc::Receiver<TabEvent>) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                tracker.handle(&event).await;
            }
            tracing::debug!("Tab event stream closed");
        })
    }
}
