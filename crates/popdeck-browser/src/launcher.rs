use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Starts Chrome with remote debugging enabled
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    start_url: Option<String>,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_path,
            start_url: None,
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.start_url = url;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }

    pub fn launch(&self) -> Result<Child> {
        tracing::info!(
            "Launching {} with debugging port {}",
            self.chrome_path.display(),
            self.debugging_port
        );

        Command::new(&self.chrome_path)
            .args(self.args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn args(&self) -> Vec<String> {
        let start = match self.start_url.as_deref() {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.to_string()
            }
            Some(url) => format!("https://{}", url),
            None => "about:blank".to_string(),
        };

        vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
            start,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> ChromeLauncher {
        ChromeLauncher::new(
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/tmp/popdeck-profile"),
        )
    }

    #[test]
    fn test_args_enable_debugging_on_port() {
        let args = launcher().with_port(9333).args();

        assert!(args.contains(&"--remote-debugging-port=9333".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/popdeck-profile".to_string()));
        assert!(args.contains(&"--no-first-run".to_string()));
        assert_eq!(args.last().unwrap(), "about:blank");
    }

    #[test]
    fn test_start_url_gets_a_scheme() {
        let args = launcher()
            .with_url(Some("www.linkedin.com/in/jane-doe".to_string()))
            .args();
        assert_eq!(args.last().unwrap(), "https://www.linkedin.com/in/jane-doe");

        let args = launcher()
            .with_url(Some("http://localhost:8080".to_string()))
            .args();
        assert_eq!(args.last().unwrap(), "http://localhost:8080");
    }

    #[test]
    fn test_default_port() {
        assert_eq!(launcher().debugging_port(), DEFAULT_DEBUGGING_PORT);
    }
}
