//! Retrying, cache-backed fixture client
//!
//! Wraps a [`FixtureSource`] with the bounded-retry policy and the cache
//! fallback: callers get the freshest data available plus a marker saying
//! how fresh it is, instead of a hard failure whenever a usable snapshot
//! exists.

use prediction_core::{Match, Stage};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::FixtureCache;
use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use crate::source::FixtureSource;

/// How fresh a fixture snapshot is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Fetched from the provider on this call
    Fresh,
    /// The provider failed; this is a cached snapshot inside its validity
    /// window ("data may be stale")
    Stale,
    /// The provider is rate limited; cached snapshot served instead
    RateLimited,
}

/// A stage's fixtures together with their freshness marker
#[derive(Debug, Clone)]
pub struct StageFixtures {
    pub matches: Vec<Match>,
    pub freshness: Freshness,
}

/// Fixture client combining a provider, a cache and a retry policy
pub struct FixtureClient<S: FixtureSource> {
    source: S,
    cache: FixtureCache,
    config: SourceConfig,
}

impl<S: FixtureSource> FixtureClient<S> {
    pub fn new(source: S, config: SourceConfig) -> Self {
        let cache = FixtureCache::new(config.cache_validity);
        Self { source, cache, config }
    }

    /// Fetch a stage's fixtures, retrying on transient failures and falling
    /// back to the cache when the provider stays down or is rate limited.
    pub async fn fetch_stage(&self, stage: Stage) -> Result<StageFixtures> {
        let error = match self.fetch_stage_with_retry(stage).await {
            Ok(matches) => {
                self.cache.put(stage, matches.clone()).await;
                return Ok(StageFixtures { matches, freshness: Freshness::Fresh });
            }
            Err(error) => error,
        };

        if let Some(matches) = self.cache.get(stage).await {
            let freshness = if error.is_rate_limited() {
                Freshness::RateLimited
            } else {
                Freshness::Stale
            };
            warn!(stage = %stage.key(), %error, "serving cached fixtures");
            return Ok(StageFixtures { matches, freshness });
        }

        Err(error)
    }

    /// Fetch the provider's current-round label, with retries but no cache;
    /// the round-1 default on failure is the caller's policy, not ours.
    pub async fn current_round_label(&self) -> Result<String> {
        self.with_retry(|| self.source.current_round_label()).await
    }

    async fn fetch_stage_with_retry(&self, stage: Stage) -> Result<Vec<Match>> {
        self.with_retry(|| self.source.fetch_stage(stage)).await
    }

    async fn with_retry<T, F, Fut>(&self, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < retry.max_attempts => {
                    warn!(attempt, %error, "fixture fetch failed, retrying");
                    sleep(retry.delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    debug!(attempt, %error, "fixture fetch gave up");
                    return Err(error);
                }
            }
        }
    }
}
