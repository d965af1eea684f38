//! `popdeck config`: the settings file shared by every panel.

use anyhow::{Context, Result, bail};
use popdeck_core::config::{ConfigStore, JsonFileStore, WEBHOOK_URL_KEY};
use std::path::Path;

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

pub fn get(store: &Path, key: &str) -> Result<()> {
    let store = JsonFileStore::new(store);
    let value = runtime()?.block_on(store.get(key))?;

    match value {
        Some(value) => {
            println!("{}", value);
            Ok(())
        }
        None => bail!("'{}' is not set", key),
    }
}

pub fn set(store: &Path, key: &str, value: &str) -> Result<()> {
    if key == WEBHOOK_URL_KEY {
        validate_webhook_url(value)?;
    }

    let store = JsonFileStore::new(store);
    runtime()?.block_on(store.set(key, value))?;
    tracing::info!("Saved {} to {}", key, store.path().display());
    Ok(())
}

pub fn unset(store: &Path, key: &str) -> Result<()> {
    let store = JsonFileStore::new(store);
    let removed = runtime()?.block_on(store.remove(key))?;

    if removed {
        tracing::info!("Removed {}", key);
    } else {
        tracing::info!("{} was not set", key);
    }
    Ok(())
}

pub fn path(store: &Path) -> Result<()> {
    println!("{}", store.display());
    Ok(())
}

/// Only absolute http(s) URLs can receive webhooks
fn validate_webhook_url(value: &str) -> Result<()> {
    let url = url::Url::parse(value).with_context(|| format!("Invalid webhook URL: {}", value))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("Webhook URL must use http or https, got '{}'", url.scheme());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_validation() {
        assert!(validate_webhook_url("https://hooks.example.com/crm").is_ok());
        assert!(validate_webhook_url("http://localhost:8080/hook").is_ok());
        assert!(validate_webhook_url("hooks.example.com").is_err());
        assert!(validate_webhook_url("ftp://files.example.com").is_err());
    }
}
