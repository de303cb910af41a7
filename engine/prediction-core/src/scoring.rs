//! Tiered scoring of predictions against match results
//!
//! Exact score → 3 points, correct outcome (win/draw/loss) → 1 point,
//! anything else → 0. The same rule scores live matches against their
//! in-progress score; live points are kept apart from settled points so
//! provisional values never leak into durable totals.

use crate::types::{Match, Prediction};

/// Points for one prediction, classified by whether they are durable yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPoints {
    /// The match is finished; these points count toward stage and all-time
    /// totals.
    Settled(u8),
    /// The match is in progress; provisional points for display only.
    Live(u8),
    /// The match is not scoreable (not started, postponed, missing scores).
    None,
}

impl MatchPoints {
    pub fn settled(&self) -> u32 {
        match self {
            MatchPoints::Settled(p) => u32::from(*p),
            _ => 0,
        }
    }

    pub fn live(&self) -> u32 {
        match self {
            MatchPoints::Live(p) => u32::from(*p),
            _ => 0,
        }
    }
}

/// Score a prediction against a match result: 3 exact, 1 outcome, 0 otherwise.
///
/// Returns 0 whenever any of the four scores is absent; an unpredicted match
/// or a match without a score is simply unscoreable, not an error.
pub fn score_prediction(prediction: &Prediction, m: &Match) -> u8 {
    let (Some(ph), Some(pa)) = (prediction.home, prediction.away) else {
        return 0;
    };
    let Some((ah, aa)) = m.score() else {
        return 0;
    };

    if ph == ah && pa == aa {
        return 3;
    }

    let predicted_outcome = (i64::from(ph) - i64::from(pa)).signum();
    let actual_outcome = (i64::from(ah) - i64::from(aa)).signum();
    if predicted_outcome == actual_outcome {
        1
    } else {
        0
    }
}

/// Score a prediction and classify the result as settled or live.
pub fn match_points(prediction: &Prediction, m: &Match) -> MatchPoints {
    if m.status.is_finished() {
        MatchPoints::Settled(score_prediction(prediction, m))
    } else if m.status.is_live() {
        MatchPoints::Live(score_prediction(prediction, m))
    } else {
        MatchPoints::None
    }
}

/// Sum a slip's points over a stage's matches, settled and live kept apart.
///
/// Matches the slip has no prediction for contribute nothing, as do
/// predictions for matches missing from `matches`.
pub fn slip_points(slip: &crate::types::PredictionSlip, matches: &[Match]) -> (u32, u32) {
    let mut settled = 0;
    let mut live = 0;
    for m in matches {
        if let Some(prediction) = slip.prediction_for(m.id) {
            let points = match_points(prediction, m);
            settled += points.settled();
            live += points.live();
        }
    }
    (settled, live)
}

/// Refresh the computed point value on every prediction in a slip.
///
/// Points are never user-set; this is the only way they change. Predictions
/// whose match is neither live nor finished reset to 0.
pub fn rescore_slip(slip: &mut crate::types::PredictionSlip, matches: &[Match]) {
    for prediction in &mut slip.predictions {
        let points = matches
            .iter()
            .find(|m| m.id == prediction.match_id)
            .map(|m| {
                if m.status.is_finished() || m.status.is_live() {
                    score_prediction(prediction, m)
                } else {
                    0
                }
            })
            .unwrap_or(0);
        prediction.points = points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchStatus, PredictionSlip, Stage};
    use chrono::Utc;

    fn finished(home: u32, away: u32) -> Match {
        Match {
            id: 1,
            kickoff: Utc::now(),
            home_team: "Tigres".to_string(),
            away_team: "Monterrey".to_string(),
            home_score: Some(home),
            away_score: Some(away),
            status: MatchStatus::Finished,
            stage: Stage::Round(5),
        }
    }

    fn predict(home: u32, away: u32) -> Prediction {
        Prediction::new(1, Some(home), Some(away))
    }

    #[test]
    fn exact_score_is_three_points() {
        assert_eq!(score_prediction(&predict(2, 1), &finished(2, 1)), 3);
        assert_eq!(score_prediction(&predict(0, 0), &finished(0, 0)), 3);
    }

    #[test]
    fn correct_outcome_is_one_point() {
        // home win predicted and actual, wrong score
        assert_eq!(score_prediction(&predict(3, 0), &finished(2, 1)), 1);
        // draw predicted and actual, wrong score
        assert_eq!(score_prediction(&predict(1, 1), &finished(2, 2)), 1);
        // away win predicted and actual
        assert_eq!(score_prediction(&predict(0, 1), &finished(1, 3)), 1);
    }

    #[test]
    fn wrong_outcome_is_zero_points() {
        assert_eq!(score_prediction(&predict(1, 2), &finished(2, 1)), 0);
        assert_eq!(score_prediction(&predict(2, 2), &finished(2, 1)), 0);
    }

    #[test]
    fn missing_scores_are_unscoreable() {
        let mut m = finished(2, 1);
        m.home_score = None;
        m.away_score = None;
        assert_eq!(score_prediction(&predict(2, 1), &m), 0);

        let unpredicted = Prediction::new(1, None, Some(1));
        assert_eq!(score_prediction(&unpredicted, &finished(2, 1)), 0);
    }

    #[test]
    fn live_and_settled_points_are_classified_apart() {
        let mut m = finished(2, 1);
        assert_eq!(match_points(&predict(2, 1), &m), MatchPoints::Settled(3));

        m.status = MatchStatus::SecondHalf;
        assert_eq!(match_points(&predict(2, 1), &m), MatchPoints::Live(3));
        assert_eq!(match_points(&predict(2, 1), &m).settled(), 0);

        m.status = MatchStatus::NotStarted;
        m.home_score = None;
        m.away_score = None;
        assert_eq!(match_points(&predict(2, 1), &m), MatchPoints::None);
    }

    #[test]
    fn slip_points_keeps_settled_and_live_apart() {
        let mut slip = PredictionSlip::new("user-1".to_string(), Stage::Round(5));
        slip.upsert(Prediction::new(1, Some(2), Some(1)));
        slip.upsert(Prediction::new(2, Some(1), Some(1)));
        slip.upsert(Prediction::new(3, Some(0), Some(2)));

        let mut done = finished(2, 1);
        let mut in_play = finished(1, 1);
        in_play.id = 2;
        in_play.status = MatchStatus::FirstHalf;
        let mut upcoming = finished(0, 0);
        upcoming.id = 3;
        upcoming.status = MatchStatus::NotStarted;
        upcoming.home_score = None;
        upcoming.away_score = None;
        done.id = 1;

        let (settled, live) = slip_points(&slip, &[done, in_play, upcoming]);
        assert_eq!(settled, 3);
        assert_eq!(live, 3);
    }

    #[test]
    fn unpredicted_matches_contribute_nothing() {
        let slip = PredictionSlip::new("user-1".to_string(), Stage::Round(5));
        let (settled, live) = slip_points(&slip, &[finished(2, 1)]);
        assert_eq!((settled, live), (0, 0));
    }

    #[test]
    fn rescore_refreshes_every_prediction() {
        let mut slip = PredictionSlip::new("user-1".to_string(), Stage::Round(5));
        let mut stale = Prediction::new(1, Some(2), Some(1));
        stale.points = 3;
        slip.upsert(stale);
        slip.upsert(Prediction::new(2, Some(1), Some(0)));

        // match 1 finished with the other outcome, match 2 unknown to us
        let m = finished(1, 2);
        rescore_slip(&mut slip, &[m]);
        assert_eq!(slip.prediction_for(1).unwrap().points, 0);
        assert_eq!(slip.prediction_for(2).unwrap().points, 0);
    }

    #[test]
    fn extra_time_and_penalties_count_as_settled() {
        for status in [MatchStatus::FinishedAfterExtraTime, MatchStatus::FinishedOnPenalties] {
            let mut m = finished(1, 1);
            m.status = status;
            assert_eq!(match_points(&predict(1, 1), &m), MatchPoints::Settled(3));
        }
    }
}
