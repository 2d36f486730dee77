//! Error types for the Covalent Rust SDK

use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// HTTP request errors, including non-success statuses
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dispatcher could not be connected to at all
    #[error(
        "The Covalent server cannot be reached at {address}. Local servers can be started \
         using `covalent start` in the terminal. If you are using a remote Covalent server, \
         contact your systems administrator to report an outage."
    )]
    Unreachable {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    /// The dispatcher has no record of the dispatch
    #[error("No record of dispatch '{0}' was found on the dispatcher")]
    MissingDispatchRecord(String),

    /// The server kept answering busy after every allowed retry
    #[error("Dispatcher still busy for dispatch '{dispatch_id}' after {attempts} attempts")]
    RetryBudgetExhausted { dispatch_id: String, attempts: usize },

    /// Invalid configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration source errors
    #[error("Config error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Invalid caller-supplied arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SdkError {
    /// Returns true if this error means the dispatcher was unreachable
    pub fn is_unreachable(&self) -> bool {
        matches!(self, SdkError::Unreachable { .. })
    }
}

impl From<figment::Error> for SdkError {
    fn from(e: figment::Error) -> Self {
        SdkError::Config(Box::new(e))
    }
}
