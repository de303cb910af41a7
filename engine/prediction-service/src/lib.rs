//! Prediction Service - the engine facade
//!
//! Composes the fixture client, the totals store and the aggregation engine
//! behind the operations callers actually use: resolving the current stage,
//! checking eligibility, scoring, building group leaderboards, submitting
//! prediction batches, and the administrative totals rebuild.

mod config;
mod error;
mod service;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use service::{LeaderboardSnapshot, PredictionService};

/// Re-export commonly used types
pub use fixture_source::{Freshness, PollerHandle, SourceConfig, StageFixtures};
pub use leaderboard::{Leaderboard, LeaderboardEntry, Viewer};
pub use prediction_core::{
    can_predict, score_prediction, Group, Match, MatchStatus, PlayoffPhase, Prediction,
    PredictionSlip, Stage, StageView,
};
