use crate::bridge::{self, FOCUS_BINDING, FOCUS_SCRIPT, PUSH_BINDING};
use crate::{Error, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::cdp::browser_protocol::target::{
    EventTargetCreated, EventTargetInfoChanged, TargetId, TargetInfo,
};
use chromiumoxide::cdp::js_protocol::runtime::{AddBindingParams, EvaluateParams, EventBindingCalled};
use futures::StreamExt;
use popdeck_core::gateway::{BrowserTabs, ContentRequest, ContentResponse, InboundMessage};
use popdeck_core::{HostError, TabContext, TabEvent};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);
const EVENT_BUFFER: usize = 64;

/// A running Chrome reached over the DevTools protocol
///
/// Tab ids are CDP target ids.
pub struct CdpBrowser {
    browser: Arc<Browser>,
    port: u16,
    handler: JoinHandle<()>,
    /// Page that last reported coming to the front
    focused: Arc<Mutex<Option<String>>>,
}

/// Tab changes and page pushes observed since [`CdpBrowser::watch`]
pub struct BrowserEvents {
    pub tabs: mpsc::Receiver<TabEvent>,
    pub inbound: mpsc::Receiver<InboundMessage>,
    /// Forwarding stops when this is dropped
    pub guard: WatchGuard,
}

pub struct WatchGuard(JoinHandle<()>);

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl CdpBrowser {
    /// Connect to Chrome's debugging port, retrying while it starts up
    pub async fn connect(port: u16) -> Result<Self> {
        let endpoint = format!("http://localhost:{}", port);
        tracing::info!("Connecting to Chrome on port {}", port);

        let mut attempt = 0;
        let (browser, mut handler) = loop {
            attempt += 1;
            tracing::debug!("CDP connection attempt {} to {}", attempt, endpoint);
            match Browser::connect(&endpoint).await {
                Ok(connected) => break connected,
                Err(e) if attempt >= CONNECT_ATTEMPTS => {
                    return Err(Error::Connect {
                        port,
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!("CDP connection failed ({}), retrying", e);
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                }
            }
        };
        tracing::info!("CDP connection established");

        // Commands only make progress while the handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            port,
            handler,
            focused: Arc::new(Mutex::new(None)),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Start forwarding tab events and page pushes
    ///
    /// Every page, current and future, gets the push binding and the focus
    /// hook installed. A tab the user switches to reports itself as activated.
    pub async fn watch(&self) -> Result<BrowserEvents> {
        let (tab_tx, tabs) = mpsc::channel(EVENT_BUFFER);
        let (push_tx, inbound) = mpsc::channel(EVENT_BUFFER);
        let sinks = PageSinks {
            push: push_tx,
            tabs: tab_tx.clone(),
            focused: Arc::clone(&self.focused),
        };

        let mut bound = HashSet::new();
        for page in self.browser.pages().await? {
            if let Err(e) = install_page_hooks(&page, sinks.clone()).await {
                tracing::warn!("Could not install page hooks: {}", e);
                continue;
            }
            bound.insert(page.target_id().inner().clone());
        }

        let mut created = self.browser.event_listener::<EventTargetCreated>().await?;
        let mut changed = self.browser.event_listener::<EventTargetInfoChanged>().await?;
        let browser = Arc::clone(&self.browser);

        let task = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    Some(event) = created.next() => tab_event(&event.target_info, true),
                    Some(event) = changed.next() => tab_event(&event.target_info, false),
                    else => break,
                };
                let Some((info, event)) = event else {
                    continue;
                };

                let id = info.target_id.inner().clone();
                if !bound.contains(&id) {
                    match browser.get_page(info.target_id.clone()).await {
                        Ok(page) => match install_page_hooks(&page, sinks.clone()).await {
                            Ok(()) => {
                                bound.insert(id);
                            }
                            Err(e) => tracing::debug!("Page hooks for {} failed: {}", id, e),
                        },
                        Err(e) => tracing::debug!("Page {} not attached yet: {}", id, e),
                    }
                }

                if tab_tx.send(event).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Browser event stream closed");
        });

        Ok(BrowserEvents {
            tabs,
            inbound,
            guard: WatchGuard(task),
        })
    }

    async fn page(&self, id: &str) -> std::result::Result<Page, HostError> {
        self.browser
            .get_page(TargetId::from(id.to_string()))
            .await
            .map_err(|_| HostError::new(bridge::NO_RECEIVER))
    }
}

impl Drop for CdpBrowser {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn tab_event(info: &TargetInfo, created: bool) -> Option<(TargetInfo, TabEvent)> {
    if info.r#type != "page" {
        return None;
    }

    let tab_id = info.target_id.inner().clone();
    let event = if created {
        TabEvent::Activated { tab_id }
    } else {
        TabEvent::Updated {
            tab_id,
            complete: true,
        }
    };
    Some((info.clone(), event))
}

/// Where a page's binding calls are delivered
#[derive(Clone)]
struct PageSinks {
    push: mpsc::Sender<InboundMessage>,
    tabs: mpsc::Sender<TabEvent>,
    focused: Arc<Mutex<Option<String>>>,
}

impl PageSinks {
    /// Returns false once the receiving side is gone
    async fn deliver(&self, tab_id: &str, name: &str, payload: &str) -> bool {
        match name {
            PUSH_BINDING => match bridge::decode_push(payload) {
                Some(message) => self.push.send(message).await.is_ok(),
                None => true,
            },
            FOCUS_BINDING => match bridge::decode_focus(tab_id, payload) {
                Some(event) => {
                    *self.focused.lock().unwrap_or_else(PoisonError::into_inner) =
                        Some(tab_id.to_string());
                    self.tabs.send(event).await.is_ok()
                }
                None => true,
            },
            _ => true,
        }
    }
}

async fn install_page_hooks(page: &Page, sinks: PageSinks) -> Result<()> {
    let mut calls = page.event_listener::<EventBindingCalled>().await?;
    page.execute(AddBindingParams::new(PUSH_BINDING)).await?;
    page.execute(AddBindingParams::new(FOCUS_BINDING)).await?;
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(FOCUS_SCRIPT))
        .await?;
    // The document already loaded never ran the new-document script
    if let Err(e) = page.evaluate(FOCUS_SCRIPT).await {
        tracing::debug!("Focus hook missing from current document: {}", e);
    }

    let tab_id = page.target_id().inner().clone();
    tokio::spawn(async move {
        while let Some(call) = calls.next().await {
            if !sinks.deliver(&tab_id, &call.name, &call.payload).await {
                break;
            }
        }
    });

    Ok(())
}

async fn describe_page(page: &Page) -> TabContext {
    TabContext {
        id: page.target_id().inner().clone(),
        url: page.url().await.ok().flatten(),
        title: page.get_title().await.ok().flatten(),
    }
}

fn host_error(err: impl std::fmt::Display) -> HostError {
    HostError::new(err.to_string())
}

#[async_trait]
impl BrowserTabs for CdpBrowser {
    /// The page that last came to the front if it is still visible, then
    /// the first visible page, then the first page
    async fn active_tab(&self) -> std::result::Result<Option<TabContext>, HostError> {
        let pages = self.browser.pages().await.map_err(host_error)?;
        let focused = self
            .focused
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut first_visible = None;
        for page in &pages {
            let visibility = page
                .evaluate("document.visibilityState")
                .await
                .ok()
                .and_then(|result| result.into_value::<String>().ok());
            if visibility.as_deref() != Some("visible") {
                continue;
            }
            if focused.as_deref() == Some(page.target_id().inner().as_str()) {
                return Ok(Some(describe_page(page).await));
            }
            first_visible.get_or_insert(page);
        }

        match first_visible.or(pages.first()) {
            Some(page) => Ok(Some(describe_page(page).await)),
            None => Ok(None),
        }
    }

    async fn send_message(
        &self,
        tab: &TabContext,
        request: &ContentRequest,
    ) -> std::result::Result<ContentResponse, HostError> {
        let page = self.page(&tab.id).await?;
        let params = EvaluateParams::builder()
            .expression(bridge::request_script(request)?)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(HostError::new)?;

        let value: Value = page
            .evaluate_expression(params)
            .await
            .map_err(host_error)?
            .into_value()
            .map_err(host_error)?;

        bridge::decode_reply(value)
    }

    async fn create_tab(&self, url: &str) -> std::result::Result<(), HostError> {
        self.browser.new_page(url).await.map_err(host_error)?;
        tracing::debug!("Opened tab {}", url);
        Ok(())
    }
}
