//! Error types for SpreadScope data sources.

use thiserror::Error;

/// Failure while talking to the backend or reading its responses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpreadScopeError {
    /// Endpoint answered with a non-success status.
    #[error("{endpoint} responded with status {status}")]
    Transport { endpoint: String, status: u16 },

    /// Request never produced a response.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl SpreadScopeError {
    /// Check if a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SpreadScopeError::Transport { status, .. } => *status == 429 || *status >= 500,
            SpreadScopeError::NetworkError(_) | SpreadScopeError::Timeout(_) => true,
            SpreadScopeError::Decode(_) | SpreadScopeError::ConfigurationError(_) => false,
        }
    }

    /// Get a stable error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            SpreadScopeError::Transport { .. } => "TRANSPORT_STATUS",
            SpreadScopeError::NetworkError(_) => "NETWORK_ERROR",
            SpreadScopeError::Timeout(_) => "TIMEOUT",
            SpreadScopeError::Decode(_) => "DECODE_ERROR",
            SpreadScopeError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }

    /// HTTP status, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpreadScopeError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for SpreadScope operations.
pub type Result<T> = std::result::Result<T, SpreadScopeError>;
