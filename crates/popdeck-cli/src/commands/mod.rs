use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub mod action;
pub mod completion;
pub mod config;
pub mod deck;
pub mod panels;

/// How to start Chrome when the deck launches it
#[derive(Debug, Clone, Default)]
pub struct ChromeOptions {
    pub chrome_path: Option<PathBuf>,
    pub url: Option<String>,
    /// Named profile; a temporary one is used when absent
    pub profile: Option<String>,
    /// Force a temporary profile
    pub temp: bool,
}

impl ChromeOptions {
    /// The named profile to launch with, or `None` for a temporary one
    pub fn profile_name(&self) -> Option<&str> {
        if self.temp {
            return None;
        }
        self.profile.as_deref()
    }
}

/// `~/.popdeck/storage.json`
pub fn default_store_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".popdeck").join("storage.json"))
}
