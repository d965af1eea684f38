use super::WebhookTransport;
use crate::{Error, HostError, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// Request timeout duration
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Webhook transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    client: Client,
}

impl HttpWebhook {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhook {
    async fn post_json(&self, url: &str, body: &Value) -> std::result::Result<u16, HostError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Webhook {} answered HTTP {}", url, status);
        Ok(status)
    }
}
