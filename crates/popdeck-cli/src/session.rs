use crate::clipboard::SystemClipboard;
use anyhow::Result;
use popdeck_browser::CdpBrowser;
use popdeck_core::config::JsonFileStore;
use popdeck_core::gateway::HttpWebhook;
use popdeck_core::{RemoteActionGateway, TabTracker};
use std::path::Path;
use std::sync::Arc;

/// Gateway and tab tracker wired to a running Chrome
pub struct Session {
    pub browser: Arc<CdpBrowser>,
    pub gateway: RemoteActionGateway,
    pub tracker: TabTracker,
}

impl Session {
    pub async fn attach(port: u16, store: &Path) -> Result<Self> {
        let browser = Arc::new(CdpBrowser::connect(port).await?);

        let gateway = RemoteActionGateway::new(
            browser.clone(),
            Arc::new(SystemClipboard),
            Arc::new(HttpWebhook::new()?),
            Arc::new(JsonFileStore::new(store)),
        );
        let tracker = TabTracker::new(browser.clone());

        let tab = tracker.refresh().await;
        tracing::debug!("Initial tab: {:?}", tab);

        Ok(Self {
            browser,
            gateway,
            tracker,
        })
    }
}
