//! Stage-keyed fixture cache with a bounded validity window
//!
//! Read-mostly and safe to share: entries are replaced whole under a single
//! lock, and staleness is bounded by the validity window rather than by any
//! coordination between callers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use prediction_core::{Match, Stage};
use tokio::sync::RwLock;

struct CacheEntry {
    matches: Vec<Match>,
    inserted_at: Instant,
}

/// Cache of per-stage fixture snapshots
pub struct FixtureCache {
    validity: Duration,
    entries: RwLock<HashMap<Stage, CacheEntry>>,
}

impl FixtureCache {
    pub fn new(validity: Duration) -> Self {
        Self { validity, entries: RwLock::new(HashMap::new()) }
    }

    /// Return the cached snapshot for a stage if it is still inside the
    /// validity window
    pub async fn get(&self, stage: Stage) -> Option<Vec<Match>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&stage)?;
        if entry.inserted_at.elapsed() < self.validity {
            Some(entry.matches.clone())
        } else {
            None
        }
    }

    /// Replace the snapshot for a stage
    pub async fn put(&self, stage: Stage, matches: Vec<Match>) {
        let mut entries = self.entries.write().await;
        entries.insert(stage, CacheEntry { matches, inserted_at: Instant::now() });
    }
}
