//! Leaderboard value types

use prediction_core::{Prediction, UserId};
use serde::{Deserialize, Serialize};

/// Who is looking at the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Viewer {
    pub fn new(user_id: impl Into<UserId>, is_admin: bool) -> Self {
        Self { user_id: user_id.into(), is_admin }
    }
}

/// One group member's row in a leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    /// Points from finished matches in this stage
    pub settled_points: u32,
    /// Provisional points from matches in progress
    pub live_points: u32,
    /// settled + live; the stage ranking key
    pub stage_points: u32,
    /// Sum of settled stage totals across every stage; live points never
    /// contribute here
    pub all_time_points: u32,
    pub has_predicted: bool,
    /// The member's predictions for this stage, or `None` when the
    /// visibility policy hides them from this viewer
    pub predictions: Option<Vec<Prediction>>,
}

/// Ranked leaderboard views for one group and stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Descending by stage points; ties keep member enumeration order
    pub stage: Vec<LeaderboardEntry>,
    /// Descending by all-time points
    pub overall: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// The group-wide view; identical to the overall ranking by design.
    pub fn global(&self) -> &[LeaderboardEntry] {
        &self.overall
    }
}
