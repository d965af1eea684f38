use async_trait::async_trait;
use popdeck_core::HostError;
use popdeck_core::gateway::Clipboard;

/// The desktop clipboard
///
/// A fresh handle is opened per write on a blocking thread, since some
/// platforms tie the handle to the thread that created it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), HostError> {
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| HostError::new(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| HostError::new(e.to_string()))
        })
        .await
        .map_err(|e| HostError::new(e.to_string()))?
    }
}
