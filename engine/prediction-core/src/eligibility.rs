//! Prediction eligibility rules
//!
//! Regular-season predictions lock five minutes before kickoff. Playoff
//! predictions stay editable right up to kickoff, even when a prediction
//! already exists; that asymmetry is intentional, playoff slips may need
//! correction until the bracket starts.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Match, MatchStatus, StageView};

/// Regular-season predictions lock this many seconds before kickoff
pub const PREDICTION_LOCK_SECS: i64 = 300;

/// Whether a prediction may still be created or edited for this match.
///
/// Rules are evaluated in order; the first that applies wins.
pub fn can_predict(m: &Match, view: StageView, now: DateTime<Utc>) -> bool {
    if view == StageView::Playoffs && m.status == MatchStatus::NotStarted {
        return true;
    }
    if m.status.is_finished() {
        return false;
    }
    if m.status.is_live() {
        return false;
    }
    if m.status == MatchStatus::NotStarted {
        return m.kickoff - now > Duration::seconds(PREDICTION_LOCK_SECS);
    }
    // Postponed or otherwise not playable
    false
}
