//! Remote action gateway: one request/response contract for everything a
//! panel asks of the outside world (content scripts, tabs, clipboard,
//! webhooks).

mod webhook;

pub use webhook::HttpWebhook;

use crate::config::{ConfigStore, WEBHOOK_URL_KEY};
use crate::site::SiteRule;
use crate::tabs::TabContext;
use crate::{GatewayError, HostError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Message sent to the content script of a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub action: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ContentRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

/// Reply of a content script
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ContentResponse {
    pub fn success(data: Option<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Message pushed by a page at any time, independent of pending requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: String,
}

impl InboundMessage {
    pub fn new(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Tabs of the host browser
#[async_trait]
pub trait BrowserTabs: Send + Sync {
    /// The tab the user is currently looking at, if any
    async fn active_tab(&self) -> Result<Option<TabContext>, HostError>;

    /// Deliver a request to the content script of `tab` and wait for its reply
    async fn send_message(
        &self,
        tab: &TabContext,
        request: &ContentRequest,
    ) -> Result<ContentResponse, HostError>;

    /// Open `url` in a new tab
    async fn create_tab(&self, url: &str) -> Result<(), HostError>;
}

/// System clipboard, text only
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), HostError>;
}

/// Outbound HTTP for webhooks
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST a JSON body, returning the HTTP status code
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, HostError>;
}

/// Strip the query string from `url` and append `suffix`
pub fn derive_url(url: &str, suffix: &str) -> String {
    let base = url.split_once('?').map_or(url, |(base, _)| base);
    format!("{}{}", base, suffix)
}

/// Single-shot remote operations used by panel actions
///
/// No operation retries; each resolves exactly once.
#[derive(Clone)]
pub struct RemoteActionGateway {
    tabs: Arc<dyn BrowserTabs>,
    clipboard: Arc<dyn Clipboard>,
    webhook: Arc<dyn WebhookTransport>,
    config: Arc<dyn ConfigStore>,
}

impl RemoteActionGateway {
    pub fn new(
        tabs: Arc<dyn BrowserTabs>,
        clipboard: Arc<dyn Clipboard>,
        webhook: Arc<dyn WebhookTransport>,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            tabs,
            clipboard,
            webhook,
            config,
        }
    }

    pub fn tabs(&self) -> Arc<dyn BrowserTabs> {
        Arc::clone(&self.tabs)
    }

    pub fn config(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.config)
    }

    /// Ask the content script of `tab` to run `request`
    ///
    /// Nothing is sent unless a tab is known and its URL satisfies `site`.
    pub async fn invoke_content_action(
        &self,
        tab: Option<&TabContext>,
        site: SiteRule,
        request: &ContentRequest,
    ) -> Result<ContentResponse, GatewayError> {
        let tab = tab.ok_or(GatewayError::NoActiveTab)?;

        let on_site = tab.url.as_deref().is_some_and(|url| site.matches(url));
        if !on_site {
            tracing::debug!(
                "Refusing '{}' on tab {} ({:?}): wrong site",
                request.action,
                tab.id,
                tab.url
            );
            return Err(GatewayError::WrongContext);
        }

        tracing::debug!("Sending '{}' to tab {}", request.action, tab.id);
        let response = self
            .tabs
            .send_message(tab, request)
            .await
            .map_err(|e| GatewayError::TransportError(e.0))?;

        if !response.is_success() {
            let message = response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::debug!("'{}' failed remotely: {}", request.action, message);
            return Err(GatewayError::RemoteFailure(message));
        }

        Ok(response)
    }

    /// POST `payload` to the webhook at `url`
    pub async fn invoke_webhook(&self, url: Option<&str>, payload: &Value) -> Result<(), GatewayError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(GatewayError::MissingConfig)?;

        tracing::debug!("Posting to webhook {}", url);
        let status = self
            .webhook
            .post_json(url, payload)
            .await
            .map_err(|e| GatewayError::NetworkError(e.0))?;

        if !(200..300).contains(&status) {
            tracing::warn!("Webhook returned HTTP {}", status);
            return Err(GatewayError::NetworkError(
                "Network response was not ok".to_string(),
            ));
        }

        Ok(())
    }

    /// Send `{ field: text }` to the configured webhook
    pub async fn send_to_webhook(&self, field: &str, text: &str) -> Result<(), GatewayError> {
        if text.is_empty() {
            return Err(GatewayError::EmptyData);
        }

        let url = self
            .config
            .get(WEBHOOK_URL_KEY)
            .await
            .map_err(|e| GatewayError::NetworkError(e.0))?;

        let mut body = Map::new();
        body.insert(field.to_string(), Value::String(text.to_string()));
        self.invoke_webhook(url.as_deref(), &Value::Object(body)).await
    }

    pub async fn copy_to_clipboard(&self, text: &str) -> Result<(), GatewayError> {
        if text.is_empty() {
            return Err(GatewayError::EmptyData);
        }

        self.clipboard
            .write_text(text)
            .await
            .map_err(|e| GatewayError::ClipboardError(e.0))
    }

    /// Open the tab's URL, minus its query string, plus `suffix` in a new tab
    pub async fn open_derived_url(
        &self,
        tab: Option<&TabContext>,
        site: SiteRule,
        suffix: &str,
    ) -> Result<String, GatewayError> {
        let url = tab
            .and_then(|t| t.url.as_deref())
            .filter(|url| site.matches(url))
            .ok_or(GatewayError::WrongContext)?;

        let target = derive_url(url, suffix);
        tracing::debug!("Opening {}", target);
        self.tabs
            .create_tab(&target)
            .await
            .map_err(|e| GatewayError::TransportError(e.0))?;

        Ok(target)
    }
}
