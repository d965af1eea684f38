pub mod bridge;
mod cdp_tabs;
mod chrome_finder;
mod error;
mod launcher;
mod profile;

pub use cdp_tabs::{BrowserEvents, CdpBrowser, WatchGuard};
pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
pub use profile::ProfileManager;
