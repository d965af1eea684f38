//! Key-value settings store shared by all panels.

use crate::{Error, HostError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the outbound webhook URL is stored
pub const WEBHOOK_URL_KEY: &str = "webhookUrl";

/// Opaque string settings, read before actions that need them
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, HostError>;

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), HostError>;

    /// Remove a key, returning whether it was present
    async fn remove(&self, key: &str) -> std::result::Result<bool, HostError>;
}

/// In-memory store, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.lock().insert(key.to_string(), value.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, HostError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), HostError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> std::result::Result<bool, HostError> {
        Ok(self.lock().remove(key).is_some())
    }
}

/// Store persisted as a flat JSON object on disk
///
/// The file is created on first write. Non-string values in a hand-edited
/// file are ignored on read.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every string setting in the file
    pub async fn load(&self) -> Result<BTreeMap<String, String>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(BTreeMap::new());
        }

        tracing::debug!("Reading settings from: {}", self.path.display());
        let contents = tokio::fs::read_to_string(&self.path).await?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let object: Map<String, Value> = serde_json::from_str(&contents)?;
        Ok(object
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect())
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, json).await.map_err(Error::Io)?;
        tracing::debug!("Settings written to: {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, HostError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), HostError> {
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> std::result::Result<bool, HostError> {
        let mut values = self.load().await?;
        let removed = values.remove(key).is_some();
        if removed {
            self.save(&values).await?;
        }
        Ok(removed)
    }
}
