#![allow(dead_code)]

use async_trait::async_trait;
use popdeck_core::config::{ConfigStore, MemoryStore, WEBHOOK_URL_KEY};
use popdeck_core::gateway::{
    BrowserTabs, Clipboard, ContentRequest, ContentResponse, WebhookTransport,
};
use popdeck_core::status::StatusFeedConfig;
use popdeck_core::{
    HostError, PanelController, PanelId, PanelRegistry, PanelShell, RemoteActionGateway,
    StatusFeed, TabContext, TabTracker,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const PROFILE_URL: &str = "https://www.linkedin.com/in/jane-doe/?originalSubdomain=uk";

type Reply = Result<ContentResponse, HostError>;

enum Scripted {
    Now(Reply),
    Later(oneshot::Receiver<Reply>),
}

/// Browser with a scripted active tab and scripted content-script replies
#[derive(Default)]
pub struct FakeTabs {
    active: Mutex<Option<TabContext>>,
    replies: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<ContentRequest>>,
    created: Mutex<Vec<String>>,
}

impl FakeTabs {
    pub fn set_active(&self, tab: Option<TabContext>) {
        *self.active.lock().unwrap() = tab;
    }

    pub fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(Scripted::Now(reply));
    }

    /// Queue a reply that resolves when the returned sender fires
    pub fn reply_later(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Scripted::Later(rx));
        tx
    }

    pub fn sent(&self) -> Vec<ContentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserTabs for FakeTabs {
    async fn active_tab(&self) -> Result<Option<TabContext>, HostError> {
        Ok(self.active.lock().unwrap().clone())
    }

    async fn send_message(
        &self,
        _tab: &TabContext,
        request: &ContentRequest,
    ) -> Result<ContentResponse, HostError> {
        self.sent.lock().unwrap().push(request.clone());
        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            None => Ok(ContentResponse::success(None)),
            Some(Scripted::Now(reply)) => reply,
            Some(Scripted::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(HostError::new("reply dropped"))),
        }
    }

    async fn create_tab(&self, url: &str) -> Result<(), HostError> {
        self.created.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    writes: Mutex<Vec<String>>,
    denied: Mutex<bool>,
}

impl FakeClipboard {
    pub fn deny(&self) {
        *self.denied.lock().unwrap() = true;
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), HostError> {
        if *self.denied.lock().unwrap() {
            return Err(HostError::new("Document is not focused."));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct FakeWebhook {
    posts: Mutex<Vec<(String, Value)>>,
    status: Mutex<u16>,
    unreachable: Mutex<bool>,
}

impl Default for FakeWebhook {
    fn default() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            status: Mutex::new(200),
            unreachable: Mutex::new(false),
        }
    }
}

impl FakeWebhook {
    pub fn respond_with(&self, status: u16) {
        *self.status.lock().unwrap() = status;
    }

    pub fn go_offline(&self) {
        *self.unreachable.lock().unwrap() = true;
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for FakeWebhook {
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, HostError> {
        if *self.unreachable.lock().unwrap() {
            return Err(HostError::new("error sending request"));
        }
        self.posts.lock().unwrap().push((url.to_string(), body.clone()));
        Ok(*self.status.lock().unwrap())
    }
}

/// Gateway, tracker and fakes wired together
pub struct Harness {
    pub tabs: Arc<FakeTabs>,
    pub clipboard: Arc<FakeClipboard>,
    pub webhook: Arc<FakeWebhook>,
    pub store: Arc<MemoryStore>,
    pub gateway: RemoteActionGateway,
    pub tracker: TabTracker,
}

impl Harness {
    pub fn new() -> Self {
        let tabs = Arc::new(FakeTabs::default());
        let clipboard = Arc::new(FakeClipboard::default());
        let webhook = Arc::new(FakeWebhook::default());
        let store = Arc::new(MemoryStore::new());

        let gateway = RemoteActionGateway::new(
            tabs.clone(),
            clipboard.clone(),
            webhook.clone(),
            store.clone(),
        );
        let tracker = TabTracker::new(tabs.clone());

        Self {
            tabs,
            clipboard,
            webhook,
            store,
            gateway,
            tracker,
        }
    }

    /// Point the browser at `url` and let the tracker observe it
    pub async fn on_tab(&self, url: &str) {
        self.tabs.set_active(Some(TabContext::new("42", url)));
        self.tracker.refresh().await;
    }

    pub async fn set_webhook(&self, url: &str) {
        self.store.set(WEBHOOK_URL_KEY, url).await.unwrap();
    }

    pub fn controller(&self, id: PanelId) -> PanelController {
        PanelController::new(
            id.spec(),
            self.gateway.clone(),
            self.tracker.clone(),
            StatusFeed::default(),
        )
    }

    pub fn shell(&self) -> PanelShell {
        PanelShell::new(
            PanelRegistry::builtin(),
            self.gateway.clone(),
            self.tracker.clone(),
            StatusFeedConfig::default(),
        )
    }
}

/// Yield until `condition` holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}
