//! Leaderboard aggregation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use prediction_core::{slip_points, Group, Match, PredictionSlip, Stage, StageTotal, UserId};
use tracing::debug;

use crate::types::{Leaderboard, LeaderboardEntry, Viewer};
use crate::visibility::VisibilityPolicy;

/// Prepared inputs for one group/stage aggregation: the stage's matches,
/// each member's slip for the stage, and each member's stored settled stage
/// totals across all stages.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardInputs {
    pub matches: Vec<Match>,
    pub slips: HashMap<UserId, PredictionSlip>,
    pub stage_totals: HashMap<UserId, Vec<StageTotal>>,
}

/// Aggregate one group's leaderboard for one stage.
///
/// Every member gets an entry, slip or not; members without a slip rank with
/// zero stage points and an unaffected all-time total. Sorting is stable, so
/// ties keep the group's member enumeration order.
pub fn build_leaderboard(
    group: &Group,
    stage: Stage,
    inputs: &LeaderboardInputs,
    viewer: &Viewer,
    policy: &VisibilityPolicy,
    now: DateTime<Utc>,
) -> Leaderboard {
    let all_submitted = group.members.iter().all(|member| {
        inputs
            .slips
            .get(member)
            .map(|slip| !slip.predictions.is_empty())
            .unwrap_or(false)
    });

    let mut entries = Vec::with_capacity(group.members.len());
    for member in &group.members {
        let slip = inputs.slips.get(member);
        let (settled_points, live_points) = slip
            .map(|slip| slip_points(slip, &inputs.matches))
            .unwrap_or((0, 0));
        let all_time_points = inputs
            .stage_totals
            .get(member)
            .map(|totals| totals.iter().map(|t| t.settled_points).sum())
            .unwrap_or(0);
        let has_predicted = slip.map(|s| !s.predictions.is_empty()).unwrap_or(false);

        let predictions = slip.and_then(|slip| {
            policy
                .can_view(viewer, member, stage, &inputs.matches, all_submitted, now)
                .then(|| slip.predictions.clone())
        });

        entries.push(LeaderboardEntry {
            user_id: member.clone(),
            settled_points,
            live_points,
            stage_points: settled_points + live_points,
            all_time_points,
            has_predicted,
            predictions,
        });
    }

    debug!(
        group = %group.id,
        stage = %stage.key(),
        members = entries.len(),
        all_submitted,
        "leaderboard aggregated"
    );

    let mut stage_view = entries.clone();
    stage_view.sort_by(|a, b| b.stage_points.cmp(&a.stage_points));
    let mut overall = entries;
    overall.sort_by(|a, b| b.all_time_points.cmp(&a.all_time_points));

    Leaderboard { stage: stage_view, overall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use prediction_core::{MatchStatus, Prediction};

    fn group() -> Group {
        Group {
            id: "group-1".to_string(),
            name: "La Porra".to_string(),
            members: vec!["ana".to_string(), "beto".to_string(), "carla".to_string()],
            admins: vec!["ana".to_string()],
        }
    }

    fn finished_match(id: u32, stage: Stage, home: u32, away: u32) -> Match {
        Match {
            id,
            kickoff: Utc::now() - Duration::hours(2),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            home_score: Some(home),
            away_score: Some(away),
            status: MatchStatus::Finished,
            stage,
        }
    }

    fn slip_with(user: &str, stage: Stage, predictions: &[(u32, u32, u32)]) -> PredictionSlip {
        let mut slip = PredictionSlip::new(user.to_string(), stage);
        for (match_id, home, away) in predictions {
            slip.upsert(Prediction::new(*match_id, Some(*home), Some(*away)));
        }
        slip
    }

    fn settled_total(user: &str, stage: Stage, settled: u32) -> StageTotal {
        StageTotal {
            user_id: user.to_string(),
            stage,
            settled_points: settled,
            live_points: 0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn members_without_a_slip_still_rank_with_zeros() {
        let group = group();
        let stage = Stage::Round(1);
        let mut inputs = LeaderboardInputs {
            matches: vec![finished_match(1, stage, 2, 1)],
            ..Default::default()
        };
        inputs.slips.insert("ana".to_string(), slip_with("ana", stage, &[(1, 2, 1)]));
        inputs.slips.insert("beto".to_string(), slip_with("beto", stage, &[(1, 0, 1)]));
        inputs
            .stage_totals
            .insert("carla".to_string(), vec![settled_total("carla", Stage::Round(0), 8)]);

        let viewer = Viewer::new("ana", true);
        let board = build_leaderboard(
            &group,
            stage,
            &inputs,
            &viewer,
            &VisibilityPolicy::default(),
            Utc::now(),
        );

        assert_eq!(board.stage.len(), 3);
        let carla = board.stage.iter().find(|e| e.user_id == "carla").unwrap();
        assert_eq!(carla.stage_points, 0);
        assert!(!carla.has_predicted);
        // the missing stage does not touch her all-time figure
        assert_eq!(carla.all_time_points, 8);

        assert_eq!(board.stage[0].user_id, "ana");
        assert_eq!(board.stage[0].stage_points, 3);
    }

    #[test]
    fn ties_keep_member_enumeration_order() {
        let group = group();
        let stage = Stage::Round(2);
        let mut inputs = LeaderboardInputs {
            matches: vec![finished_match(1, stage, 1, 0)],
            ..Default::default()
        };
        // all three predict the same correct outcome
        for member in &group.members {
            inputs
                .slips
                .insert(member.clone(), slip_with(member, stage, &[(1, 2, 0)]));
        }

        let board = build_leaderboard(
            &group,
            stage,
            &inputs,
            &Viewer::new("ana", false),
            &VisibilityPolicy::default(),
            Utc::now(),
        );
        let order: Vec<_> = board.stage.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, vec!["ana", "beto", "carla"]);
    }

    #[test]
    fn overall_ranks_by_all_time_and_global_matches_it() {
        let group = group();
        let stage = Stage::Round(3);
        let mut inputs = LeaderboardInputs::default();
        inputs
            .stage_totals
            .insert("beto".to_string(), vec![settled_total("beto", Stage::Round(1), 10)]);
        inputs.stage_totals.insert(
            "carla".to_string(),
            vec![
                settled_total("carla", Stage::Round(1), 7),
                settled_total("carla", Stage::Round(2), 9),
            ],
        );

        let board = build_leaderboard(
            &group,
            stage,
            &inputs,
            &Viewer::new("ana", false),
            &VisibilityPolicy::default(),
            Utc::now(),
        );
        let order: Vec<_> = board.overall.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, vec!["carla", "beto", "ana"]);
        assert_eq!(board.overall[0].all_time_points, 16);
        assert_eq!(board.global(), &board.overall[..]);
    }

    #[test]
    fn hidden_predictions_are_omitted_not_zeroed() {
        let group = group();
        let stage = Stage::Round(4);
        // nothing kicked off, not everyone submitted: others stay hidden
        let mut inputs = LeaderboardInputs {
            matches: vec![{
                let mut m = finished_match(1, stage, 0, 0);
                m.kickoff = Utc::now() + Duration::hours(5);
                m.status = MatchStatus::NotStarted;
                m.home_score = None;
                m.away_score = None;
                m
            }],
            ..Default::default()
        };
        inputs.slips.insert("ana".to_string(), slip_with("ana", stage, &[(1, 1, 1)]));
        inputs.slips.insert("beto".to_string(), slip_with("beto", stage, &[(1, 2, 0)]));

        let board = build_leaderboard(
            &group,
            stage,
            &inputs,
            &Viewer::new("beto", false),
            &VisibilityPolicy::default(),
            Utc::now(),
        );
        let ana = board.stage.iter().find(|e| e.user_id == "ana").unwrap();
        assert!(ana.predictions.is_none());
        assert!(ana.has_predicted);
        let beto = board.stage.iter().find(|e| e.user_id == "beto").unwrap();
        assert_eq!(beto.predictions.as_ref().unwrap().len(), 1);
    }
}
