use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A Chrome user-data directory
///
/// Temporary profiles are removed on drop; named and persistent ones stay.
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    pub fn temporary() -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("popdeck-profile-")
            .tempdir()?
            .keep();

        tracing::debug!("Temporary profile at {}", path.display());
        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// `~/.popdeck/profiles/<name>`
    pub fn named(name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: {:?}", name)));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))?;
        Self::persistent(home.join(".popdeck").join("profiles").join(name))
    }

    pub fn persistent(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
