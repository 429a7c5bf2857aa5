use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkyringError>;

/// Everything that can go wrong between a query and a decoded snapshot.
///
/// All failures surface to the caller; nothing is retried or swallowed.
#[derive(Error, Debug)]
pub enum SkyringError {
    /// Malformed geometric input: negative radius, out-of-range or
    /// non-finite coordinates.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Credentials rejected by the API (HTTP 401).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Any other failed HTTP exchange: non-200 status, connection or
    /// timeout trouble.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// Response body does not match the expected state-vector schema.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The offline fixture file could not be read.
    #[error("failed to read fixture file '{}': {source}", .path.display())]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// Transport-level reqwest errors (refused connections, DNS, timeouts) are all
// connectivity trouble; body decoding never goes through reqwest's JSON path.
impl From<reqwest::Error> for SkyringError {
    fn from(e: reqwest::Error) -> Self {
        SkyringError::Connectivity(e.to_string())
    }
}

impl From<serde_json::Error> for SkyringError {
    fn from(e: serde_json::Error) -> Self {
        SkyringError::Decode(e.to_string())
    }
}
