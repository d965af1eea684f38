use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid site pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown panel: {0}")]
    UnknownPanel(String),

    #[error("No panels registered")]
    EmptyRegistry,

    #[error("Unknown action '{action}' for panel {panel}")]
    UnknownAction { panel: String, action: String },

    #[error("Panel is read-only; toggle edit mode first")]
    ReadOnly,

    #[error("Webhook client error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy of a single remote action.
///
/// Every variant is caught at the action boundary and turned into an error
/// status message; none of them is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Could not find active tab")]
    NoActiveTab,

    #[error("Active tab does not match the required site")]
    WrongContext,

    #[error("{0}")]
    TransportError(String),

    #[error("{0}")]
    RemoteFailure(String),

    #[error("Please set the webhook URL in extension options")]
    MissingConfig,

    #[error("{0}")]
    NetworkError(String),

    #[error("No data")]
    EmptyData,

    #[error("{0}")]
    ClipboardError(String),
}

/// Error reported by a host collaborator (browser, clipboard, store, HTTP).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError(message.into())
    }
}

impl From<Error> for HostError {
    fn from(err: Error) -> Self {
        HostError(err.to_string())
    }
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError(err.to_string())
    }
}
