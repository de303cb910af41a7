//! Prediction Core - domain model and pure scoring logic
//!
//! This crate holds the shared domain types for the quiniela engine (matches,
//! stages, predictions, totals, groups) and the three pure algorithms that
//! everything else composes: the tiered scoring rule, the prediction
//! eligibility rules, and playoff/round stage resolution.

pub mod eligibility;
pub mod scoring;
pub mod stage;
pub mod types;

pub use eligibility::{can_predict, PREDICTION_LOCK_SECS};
pub use scoring::{match_points, rescore_slip, score_prediction, slip_points, MatchPoints};
pub use stage::{parse_round_label, resolve_playoff_stage};
pub use types::{
    AllTimeTotal, Group, GroupId, Match, MatchId, MatchStatus, PlayoffPhase, Prediction,
    PredictionSlip, Stage, StageTotal, StageView, UserId,
};
