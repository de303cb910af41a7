//! Fixture Source - the match-data boundary
//!
//! Raw fixture retrieval belongs to an external provider; this crate owns the
//! boundary around it: the [`FixtureSource`] trait, bounded retries with a
//! distinct rate-limited path, a stage-keyed cache with a validity window,
//! and a cancellable live-refresh poller. Callers always learn how fresh the
//! data they received is.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod source;

pub use cache::FixtureCache;
pub use client::{FixtureClient, Freshness, StageFixtures};
pub use config::{PollConfig, RetryConfig, SourceConfig};
pub use error::{Result, SourceError};
pub use poller::{LivePoller, PollerHandle};
pub use source::{FixtureSource, StaticFixtureSource};
