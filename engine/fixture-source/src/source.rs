//! Fixture source trait and the scripted in-memory implementation

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use prediction_core::{Match, Stage};
use tokio::sync::Mutex;

use crate::error::{Result, SourceError};

/// Abstract trait for match-data providers.
///
/// The real HTTP provider lives outside this engine; everything in here only
/// sees typed match data through this boundary.
#[async_trait::async_trait]
pub trait FixtureSource: Send + Sync {
    /// Fetch all matches belonging to one stage
    async fn fetch_stage(&self, stage: Stage) -> Result<Vec<Match>>;

    /// Fetch the provider's "current round" marker for the regular season,
    /// a free-form label whose trailing integer is the round number
    async fn current_round_label(&self) -> Result<String>;
}

#[async_trait::async_trait]
impl<S: FixtureSource + ?Sized> FixtureSource for Arc<S> {
    async fn fetch_stage(&self, stage: Stage) -> Result<Vec<Match>> {
        (**self).fetch_stage(stage).await
    }

    async fn current_round_label(&self) -> Result<String> {
        (**self).current_round_label().await
    }
}

/// In-memory fixture source (for testing and offline use).
///
/// Serves preloaded fixtures per stage and can be scripted to fail: queued
/// errors are returned, one per call, before the stored data is served again.
pub struct StaticFixtureSource {
    stages: Mutex<HashMap<Stage, Vec<Match>>>,
    round_label: Mutex<String>,
    scripted_errors: Mutex<VecDeque<SourceError>>,
}

impl StaticFixtureSource {
    pub fn new() -> Self {
        Self {
            stages: Mutex::new(HashMap::new()),
            round_label: Mutex::new(String::new()),
            scripted_errors: Mutex::new(VecDeque::new()),
        }
    }

    /// Load or replace the fixtures for one stage
    pub async fn set_stage(&self, stage: Stage, matches: Vec<Match>) {
        self.stages.lock().await.insert(stage, matches);
    }

    pub async fn set_round_label(&self, label: impl Into<String>) {
        *self.round_label.lock().await = label.into();
    }

    /// Queue an error to be returned by the next call
    pub async fn push_error(&self, error: SourceError) {
        self.scripted_errors.lock().await.push_back(error);
    }

    async fn take_scripted_error(&self) -> Option<SourceError> {
        self.scripted_errors.lock().await.pop_front()
    }
}

impl Default for StaticFixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FixtureSource for StaticFixtureSource {
    async fn fetch_stage(&self, stage: Stage) -> Result<Vec<Match>> {
        if let Some(error) = self.take_scripted_error().await {
            return Err(error);
        }
        Ok(self.stages.lock().await.get(&stage).cloned().unwrap_or_default())
    }

    async fn current_round_label(&self) -> Result<String> {
        if let Some(error) = self.take_scripted_error().await {
            return Err(error);
        }
        Ok(self.round_label.lock().await.clone())
    }
}
