//! Error types for the fixture-source boundary

use thiserror::Error;

/// Result type alias for fixture-source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur talking to the match-data provider
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The provider could not be reached or returned a server error
    #[error("fixture source unavailable: {0}")]
    Unavailable(String),

    /// The provider signalled quota exhaustion; distinct from a generic
    /// failure so callers can serve cached data marked accordingly
    #[error("fixture source rate limit exhausted")]
    RateLimited,

    /// The request did not complete in time
    #[error("fixture source timeout: {0}")]
    Timeout(String),

    /// The provider answered with a payload we could not interpret
    #[error("fixture payload could not be decoded: {0}")]
    Decode(String),
}

impl SourceError {
    /// Create a new unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited)
    }

    /// Whether another attempt could plausibly succeed. Rate limits are not
    /// retried (the quota will not recover within one call) and malformed
    /// payloads will not parse better the second time.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_) | SourceError::Timeout(_))
    }
}
