//! Consistency synchronizer
//!
//! Totals are never edited in place: every synchronization recomputes the
//! stage total from scratch (slip against matches) and re-derives the
//! all-time total from stored settled values, then commits both as one
//! batch. Re-running with unchanged inputs writes the same values, so the
//! operation is always safe to re-issue after a failure.

use std::sync::Arc;

use chrono::Utc;
use prediction_core::{slip_points, AllTimeTotal, Match, PredictionSlip, Stage, StageTotal};
use tracing::{debug, info};

use crate::error::Result;
use crate::store::TotalsStore;

/// Recomputes and persists per-stage and all-time totals
pub struct TotalsSynchronizer<S: TotalsStore> {
    store: Arc<S>,
}

impl<S: TotalsStore> TotalsSynchronizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Recompute one stage total from scratch and commit it together with
    /// the re-derived all-time total.
    ///
    /// The all-time figure is the sum of stored settled stage totals
    /// excluding this stage, plus the freshly computed settled value, so a
    /// stale stored value for this stage can never be double counted.
    pub async fn persist_stage_total(
        &self,
        user_id: &str,
        stage: Stage,
        slip: &PredictionSlip,
        matches: &[Match],
    ) -> Result<StageTotal> {
        let (settled_points, live_points) = slip_points(slip, matches);
        let stage_total = StageTotal {
            user_id: user_id.to_string(),
            stage,
            settled_points,
            live_points,
            updated_at: Utc::now(),
        };

        let stored = self.store.load_stage_totals(user_id).await?;
        let other_settled: u32 = stored
            .iter()
            .filter(|total| total.stage != stage)
            .map(|total| total.settled_points)
            .sum();
        let all_time = AllTimeTotal {
            user_id: user_id.to_string(),
            points: other_settled + settled_points,
            updated_at: stage_total.updated_at,
        };

        debug!(
            user_id,
            stage = %stage.key(),
            settled_points,
            live_points,
            all_time = all_time.points,
            "committing totals batch"
        );
        self.store.commit_totals(stage_total.clone(), all_time).await?;
        Ok(stage_total)
    }

    /// Rebuild every stage total and the all-time total for one user from
    /// scratch. Used for repairing drift; converges to the same stored state
    /// as incremental `persist_stage_total` calls in any order.
    ///
    /// `stages` pairs each stage the user has predicted with that stage's
    /// matches. Stages without a stored slip are recomputed against an empty
    /// slip, which settles them at zero.
    pub async fn rebuild_user_totals(
        &self,
        user_id: &str,
        stages: &[(Stage, Vec<Match>)],
    ) -> Result<AllTimeTotal> {
        info!(user_id, stages = stages.len(), "rebuilding user totals");
        for (stage, matches) in stages {
            let slip = self
                .store
                .load_slip(user_id, *stage)
                .await?
                .unwrap_or_else(|| PredictionSlip::new(user_id.to_string(), *stage));
            self.persist_stage_total(user_id, *stage, &slip, matches).await?;
        }

        match self.store.load_all_time_total(user_id).await? {
            Some(all_time) => Ok(all_time),
            None => Ok(AllTimeTotal {
                user_id: user_id.to_string(),
                points: 0,
                updated_at: Utc::now(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTotalsStore;
    use chrono::Utc;
    use prediction_core::{MatchStatus, Prediction};

    fn finished_match(id: u32, stage: Stage, home: u32, away: u32) -> Match {
        Match {
            id,
            kickoff: Utc::now(),
            home_team: "Pachuca".to_string(),
            away_team: "Juárez".to_string(),
            home_score: Some(home),
            away_score: Some(away),
            status: MatchStatus::Finished,
            stage,
        }
    }

    fn live_match(id: u32, stage: Stage, home: u32, away: u32) -> Match {
        let mut m = finished_match(id, stage, home, away);
        m.status = MatchStatus::SecondHalf;
        m
    }

    fn slip_with(user: &str, stage: Stage, predictions: &[(u32, u32, u32)]) -> PredictionSlip {
        let mut slip = PredictionSlip::new(user.to_string(), stage);
        for (match_id, home, away) in predictions {
            slip.upsert(Prediction::new(*match_id, Some(*home), Some(*away)));
        }
        slip
    }

    fn synchronizer() -> (Arc<MemoryTotalsStore>, TotalsSynchronizer<MemoryTotalsStore>) {
        let store = Arc::new(MemoryTotalsStore::new());
        (store.clone(), TotalsSynchronizer::new(store))
    }

    #[tokio::test]
    async fn settled_total_excludes_live_matches() {
        let (store, sync) = synchronizer();
        let stage = Stage::Round(1);
        let matches = vec![
            finished_match(1, stage, 2, 1),
            live_match(2, stage, 1, 0),
        ];
        let slip = slip_with("user-1", stage, &[(1, 2, 1), (2, 1, 0)]);
        store.save_slip(&slip).await.unwrap();

        let total = sync.persist_stage_total("user-1", stage, &slip, &matches).await.unwrap();
        assert_eq!(total.settled_points, 3);
        assert_eq!(total.live_points, 3);
        // only the settled component reaches the all-time figure
        assert_eq!(store.load_all_time_total("user-1").await.unwrap().unwrap().points, 3);
    }

    #[tokio::test]
    async fn persist_is_idempotent() {
        let (store, sync) = synchronizer();
        let stage = Stage::Round(2);
        let matches = vec![finished_match(1, stage, 1, 1)];
        let slip = slip_with("user-1", stage, &[(1, 0, 0)]);

        let first = sync.persist_stage_total("user-1", stage, &slip, &matches).await.unwrap();
        let second = sync.persist_stage_total("user-1", stage, &slip, &matches).await.unwrap();
        assert_eq!(first.settled_points, second.settled_points);
        assert_eq!(first.settled_points, 1);
        assert_eq!(store.load_all_time_total("user-1").await.unwrap().unwrap().points, 1);
    }

    #[tokio::test]
    async fn all_time_never_double_counts_a_rewritten_stage() {
        let (store, sync) = synchronizer();
        let round1 = Stage::Round(1);
        let round2 = Stage::Round(2);
        let matches1 = vec![finished_match(1, round1, 2, 0)];
        let matches2 = vec![finished_match(2, round2, 1, 3)];

        let slip1 = slip_with("user-1", round1, &[(1, 2, 0)]);
        let slip2 = slip_with("user-1", round2, &[(2, 0, 1)]);
        sync.persist_stage_total("user-1", round1, &slip1, &matches1).await.unwrap();
        sync.persist_stage_total("user-1", round2, &slip2, &matches2).await.unwrap();
        assert_eq!(store.load_all_time_total("user-1").await.unwrap().unwrap().points, 4);

        // rewrite round 1 with a weaker slip; the old 3 must not linger
        let weaker = slip_with("user-1", round1, &[(1, 1, 0)]);
        sync.persist_stage_total("user-1", round1, &weaker, &matches1).await.unwrap();
        assert_eq!(store.load_all_time_total("user-1").await.unwrap().unwrap().points, 2);
    }

    #[tokio::test]
    async fn failed_commit_leaves_the_pair_untouched_and_is_retryable() {
        let (store, sync) = synchronizer();
        let stage = Stage::Round(3);
        let matches = vec![finished_match(1, stage, 2, 2)];
        let slip = slip_with("user-1", stage, &[(1, 2, 2)]);

        store.fail_next_commit();
        assert!(sync.persist_stage_total("user-1", stage, &slip, &matches).await.is_err());
        assert!(store.load_stage_total("user-1", stage).await.unwrap().is_none());
        assert!(store.load_all_time_total("user-1").await.unwrap().is_none());

        // the retry succeeds and lands the same values
        let total = sync.persist_stage_total("user-1", stage, &slip, &matches).await.unwrap();
        assert_eq!(total.settled_points, 3);
        assert_eq!(store.load_all_time_total("user-1").await.unwrap().unwrap().points, 3);
    }

    #[tokio::test]
    async fn rebuild_converges_with_incremental_persists_in_any_order() {
        let round1 = Stage::Round(1);
        let round2 = Stage::Round(2);
        let matches1 = vec![finished_match(1, round1, 2, 0)];
        let matches2 = vec![finished_match(2, round2, 0, 0)];
        let slip1 = slip_with("user-1", round1, &[(1, 2, 0)]);
        let slip2 = slip_with("user-1", round2, &[(2, 0, 0)]);

        // incremental, order A
        let (store_a, sync_a) = synchronizer();
        store_a.save_slip(&slip1).await.unwrap();
        store_a.save_slip(&slip2).await.unwrap();
        sync_a.persist_stage_total("user-1", round1, &slip1, &matches1).await.unwrap();
        sync_a.persist_stage_total("user-1", round2, &slip2, &matches2).await.unwrap();

        // incremental, order B
        let (store_b, sync_b) = synchronizer();
        store_b.save_slip(&slip1).await.unwrap();
        store_b.save_slip(&slip2).await.unwrap();
        sync_b.persist_stage_total("user-1", round2, &slip2, &matches2).await.unwrap();
        sync_b.persist_stage_total("user-1", round1, &slip1, &matches1).await.unwrap();

        // batch rebuild
        let (store_c, sync_c) = synchronizer();
        store_c.save_slip(&slip1).await.unwrap();
        store_c.save_slip(&slip2).await.unwrap();
        let stages = vec![(round1, matches1.clone()), (round2, matches2.clone())];
        let rebuilt = sync_c.rebuild_user_totals("user-1", &stages).await.unwrap();

        let expected = 3 + 3;
        for store in [&store_a, &store_b, &store_c] {
            assert_eq!(
                store.load_all_time_total("user-1").await.unwrap().unwrap().points,
                expected
            );
            assert_eq!(
                store.load_stage_total("user-1", round1).await.unwrap().unwrap().settled_points,
                3
            );
        }
        assert_eq!(rebuilt.points, expected);

        // rebuilding again changes nothing
        let again = sync_c.rebuild_user_totals("user-1", &stages).await.unwrap();
        assert_eq!(again.points, expected);
    }

    #[tokio::test]
    async fn rebuild_with_no_stages_reports_zero() {
        let (_, sync) = synchronizer();
        let rebuilt = sync.rebuild_user_totals("user-1", &[]).await.unwrap();
        assert_eq!(rebuilt.points, 0);
    }
}
