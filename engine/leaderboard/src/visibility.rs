//! Prediction visibility policy
//!
//! Scoring is never withheld; what a viewer may see of other members'
//! predictions is. The Final stage has its own rule: everyone else's
//! predictions stay hidden until the configured reveal timestamp, no matter
//! how far the bracket has progressed.

use chrono::{DateTime, Utc};
use prediction_core::{Match, Stage};

use crate::types::Viewer;

/// Decides whether a viewer may see a member's predictions for a stage
#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    /// When Final-stage predictions become visible to non-owners and
    /// non-admins. Until configured, they stay hidden.
    pub reveal_at: Option<DateTime<Utc>>,
}

impl VisibilityPolicy {
    pub fn new(reveal_at: Option<DateTime<Utc>>) -> Self {
        Self { reveal_at }
    }

    /// Whether `viewer` may see `owner`'s predictions.
    ///
    /// `all_submitted` says every group member has at least one prediction
    /// stored for the stage; outside the Final, that opens the stage early,
    /// otherwise visibility waits for the first kickoff.
    pub fn can_view(
        &self,
        viewer: &Viewer,
        owner: &str,
        stage: Stage,
        matches: &[Match],
        all_submitted: bool,
        now: DateTime<Utc>,
    ) -> bool {
        if viewer.user_id == owner || viewer.is_admin {
            return true;
        }
        if stage.is_final() {
            return self.reveal_at.map(|at| now >= at).unwrap_or(false);
        }
        let kicked_off = matches
            .iter()
            .map(|m| m.kickoff)
            .min()
            .map(|first| now >= first)
            .unwrap_or(false);
        kicked_off || all_submitted
    }
}
