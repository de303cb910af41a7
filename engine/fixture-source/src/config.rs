//! Configuration for the fixture-source boundary

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for fixture fetching, caching and live polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Retry policy for provider calls
    pub retry: RetryConfig,

    /// How long a cached stage snapshot stays valid
    pub cache_validity: Duration,

    /// Live-refresh polling cadence
    pub poll: PollConfig,
}

/// Retry policy: a fixed number of attempts with a fixed delay between them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay between attempts
    pub delay: Duration,
}

/// Live-refresh polling cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Poll interval while the stage has matches in progress
    pub live_interval: Duration,

    /// Poll interval while nothing is live
    pub idle_interval: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            cache_validity: Duration::from_secs(300),
            poll: PollConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, delay: Duration::from_secs(2) }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            live_interval: Duration::from_secs(30),
            idle_interval: Duration::from_secs(300),
        }
    }
}

impl SourceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be greater than 0".to_string());
        }
        if self.cache_validity.is_zero() {
            return Err("cache_validity must be greater than 0".to_string());
        }
        if self.poll.live_interval.is_zero() || self.poll.idle_interval.is_zero() {
            return Err("poll intervals must be greater than 0".to_string());
        }
        Ok(())
    }
}
