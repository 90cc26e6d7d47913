//! Error types for the jsonwx driver.

use thiserror::Error;

/// A single HTTP attempt failed.
///
/// Recovered by the fetcher's retry loop; never returned to callers on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, or a broken transfer
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The response body was not valid JSON
    #[error("response body is not JSON: {0}")]
    Body(#[from] serde_json::Error),
}

/// Errors returned by the reading fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Every attempt in the retry budget failed
    #[error("max retries ({attempts}) exceeded for readings: {last}")]
    RetriesExceeded {
        attempts: u32,
        #[source]
        last: TransportError,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// The raw reading did not have the expected windmeter shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("`response.windmeters` is empty")]
    EmptyWindmeters,

    #[error("no degree value in direction text {0:?}")]
    NoDirectionDigits(String),
}

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found or unreadable
    #[error("Config error: {0}")]
    Read(String),

    /// Failed to parse configuration YAML
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Errors that stop the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Signal handler installation failed
    #[error("Init error: {0}")]
    Init(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
