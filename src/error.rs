//! Error types for configuration, the metrics provider and threshold
//! expressions.

use thiserror::Error;

/// Errors raised while resolving the wallboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required settings are absent or empty.
    #[error("Missing required settings: {}", .0.join(", "))]
    Missing(Vec<String>),

    /// The configuration sources could not be read or merged.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting is present but unusable.
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Errors that can occur when calling the metrics provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered with a non-success status.
    #[error("API returned status {status}: {message}")]
    Http { status: u16, message: String },

    /// Credentials were rejected or lack permission.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API rejected the call because of its rate limit.
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else if err.is_connect() {
            ProviderError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ProviderError::Connection(err.to_string())
        }
    }
}

/// Errors produced while tokenizing, parsing or evaluating a threshold
/// expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unexpected token {found} (expected {expected})")]
    UnexpectedToken { found: String, expected: String },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}
