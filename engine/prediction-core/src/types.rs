//! Shared domain types for the quiniela engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type MatchId = u32;
pub type UserId = String;
pub type GroupId = String;

/// Match status as reported by the fixture source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    /// In progress without a finer-grained period marker
    Live,
    Finished,
    FinishedAfterExtraTime,
    FinishedOnPenalties,
    /// Postponed, cancelled or otherwise not playable
    Postponed,
}

impl MatchStatus {
    /// True while the match is in progress (its score is provisional)
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            MatchStatus::FirstHalf | MatchStatus::HalfTime | MatchStatus::SecondHalf | MatchStatus::Live
        )
    }

    /// True once the match has a final result
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            MatchStatus::Finished
                | MatchStatus::FinishedAfterExtraTime
                | MatchStatus::FinishedOnPenalties
        )
    }
}

/// The four playoff phases, in bracket order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayoffPhase {
    Requalification,
    Quarterfinals,
    Semifinal,
    Final,
}

impl PlayoffPhase {
    /// All phases in fixed bracket order; stage resolution and leaderboard
    /// navigation both depend on this ordering.
    pub const ALL: [PlayoffPhase; 4] = [
        PlayoffPhase::Requalification,
        PlayoffPhase::Quarterfinals,
        PlayoffPhase::Semifinal,
        PlayoffPhase::Final,
    ];

    /// Stable external identifier, also used as the document key segment
    pub fn collection_key(&self) -> &'static str {
        match self {
            PlayoffPhase::Requalification => "repechaje",
            PlayoffPhase::Quarterfinals => "cuartos",
            PlayoffPhase::Semifinal => "semifinal",
            PlayoffPhase::Final => "final",
        }
    }

    /// Parse the external identifier back into a phase
    pub fn from_collection_key(key: &str) -> Option<PlayoffPhase> {
        PlayoffPhase::ALL
            .into_iter()
            .find(|phase| phase.collection_key() == key)
    }

    /// Human-readable phase name
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayoffPhase::Requalification => "Repechaje",
            PlayoffPhase::Quarterfinals => "Cuartos de final",
            PlayoffPhase::Semifinal => "Semifinal",
            PlayoffPhase::Final => "Final",
        }
    }
}

/// A competition stage: a regular-season round or a playoff phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Round(u32),
    Playoff(PlayoffPhase),
}

impl Stage {
    /// Stable document key for this stage ("round-7", "playoff-cuartos")
    pub fn key(&self) -> String {
        match self {
            Stage::Round(n) => format!("round-{n}"),
            Stage::Playoff(phase) => format!("playoff-{}", phase.collection_key()),
        }
    }

    /// Parse a key produced by [`Stage::key`]
    pub fn from_key(key: &str) -> Option<Stage> {
        if let Some(round) = key.strip_prefix("round-") {
            return round.parse::<u32>().ok().map(Stage::Round);
        }
        key.strip_prefix("playoff-")
            .and_then(PlayoffPhase::from_collection_key)
            .map(Stage::Playoff)
    }

    /// Which bracket this stage belongs to, for eligibility purposes
    pub fn view(&self) -> StageView {
        match self {
            Stage::Round(_) => StageView::RegularSeason,
            Stage::Playoff(_) => StageView::Playoffs,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Stage::Playoff(PlayoffPhase::Final))
    }
}

/// Which bracket the caller is predicting in; the eligibility rules are
/// deliberately asymmetric between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageView {
    RegularSeason,
    Playoffs,
}

/// A fixture as supplied by the match source. Read-only to this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub kickoff: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    /// Both scores are absent or both present; `Finished` implies present.
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: MatchStatus,
    pub stage: Stage,
}

impl Match {
    /// Current score, only when both sides are known
    pub fn score(&self) -> Option<(u32, u32)> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    pub fn has_kicked_off(&self, now: DateTime<Utc>) -> bool {
        self.kickoff <= now
    }
}

/// One user's predicted score for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub match_id: MatchId,
    pub home: Option<u32>,
    pub away: Option<u32>,
    /// Computed point value (0, 1 or 3); never user-set
    pub points: u8,
}

impl Prediction {
    pub fn new(match_id: MatchId, home: Option<u32>, away: Option<u32>) -> Self {
        Self { match_id, home, away, points: 0 }
    }

    pub fn has_both_scores(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }
}

/// All of one user's predictions for one stage; the unit of slip storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSlip {
    pub user_id: UserId,
    pub stage: Stage,
    pub predictions: Vec<Prediction>,
    pub updated_at: DateTime<Utc>,
}

impl PredictionSlip {
    pub fn new(user_id: UserId, stage: Stage) -> Self {
        Self { user_id, stage, predictions: Vec::new(), updated_at: Utc::now() }
    }

    pub fn prediction_for(&self, match_id: MatchId) -> Option<&Prediction> {
        self.predictions.iter().find(|p| p.match_id == match_id)
    }

    /// Insert or replace the prediction for a match, keeping the rest intact
    pub fn upsert(&mut self, prediction: Prediction) {
        match self.predictions.iter_mut().find(|p| p.match_id == prediction.match_id) {
            Some(existing) => *existing = prediction,
            None => self.predictions.push(prediction),
        }
        self.updated_at = Utc::now();
    }
}

/// A prediction group; leaderboards are always scoped to one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<UserId>,
    pub admins: Vec<UserId>,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|a| a == user_id)
    }
}

/// Derived per-(user, stage) aggregate. Safe to discard and rebuild from
/// slips + matches at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTotal {
    pub user_id: UserId,
    pub stage: Stage,
    /// Points from finished matches; the only component that persists into
    /// the all-time figure.
    pub settled_points: u32,
    /// Provisional points from in-progress matches
    pub live_points: u32,
    pub updated_at: DateTime<Utc>,
}

/// Derived per-user aggregate: sum of settled stage totals across all stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTimeTotal {
    pub user_id: UserId,
    pub points: u32,
    pub updated_at: DateTime<Utc>,
}
