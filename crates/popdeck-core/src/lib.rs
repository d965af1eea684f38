pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod panels;
pub mod shell;
pub mod site;
pub mod status;
pub mod tabs;

pub use controller::{ActionOutcome, ActionPhase, EditMode, PanelController};
pub use error::{Error, GatewayError, HostError, Result};
pub use gateway::RemoteActionGateway;
pub use panels::PanelId;
pub use shell::{PanelRegistry, PanelShell, ShellView};
pub use status::{StatusFeed, StatusKind, StatusMessage};
pub use tabs::{TabContext, TabEvent, TabTracker};
