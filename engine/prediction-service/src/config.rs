//! Configuration for the prediction service

use chrono::{DateTime, Utc};
use fixture_source::SourceConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the prediction service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Fixture fetching, caching and polling configuration
    pub source: SourceConfig,

    /// When Final-stage predictions become visible to non-owners and
    /// non-admins; hidden until then
    pub reveal_at: Option<DateTime<Utc>>,
}

impl ServiceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.source.validate()
    }
}
