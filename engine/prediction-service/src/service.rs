//! The prediction service facade

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use fixture_source::{
    FixtureClient, FixtureSource, Freshness, LivePoller, PollConfig, PollerHandle, StageFixtures,
};
use leaderboard::{build_leaderboard, Leaderboard, LeaderboardInputs, Viewer, VisibilityPolicy};
use prediction_core::{
    can_predict, parse_round_label, rescore_slip, resolve_playoff_stage, AllTimeTotal, Group,
    Prediction, PredictionSlip, Stage,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use totals_store::{TotalsStore, TotalsSynchronizer};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// A group leaderboard together with the freshness of the fixture data it
/// was aggregated from; anything but `Fresh` should surface a staleness
/// indicator rather than an error.
#[derive(Debug, Clone)]
pub struct LeaderboardSnapshot {
    pub leaderboard: Leaderboard,
    pub freshness: Freshness,
}

/// Facade over stage resolution, eligibility, scoring, aggregation and
/// totals synchronization for one season
pub struct PredictionService<S: FixtureSource, T: TotalsStore> {
    fixtures: Arc<FixtureClient<S>>,
    store: Arc<T>,
    synchronizer: TotalsSynchronizer<T>,
    policy: VisibilityPolicy,
    poll: PollConfig,
}

impl<S: FixtureSource, T: TotalsStore> PredictionService<S, T> {
    pub fn new(source: S, store: Arc<T>, config: ServiceConfig) -> Result<Self> {
        config.validate().map_err(ServiceError::Configuration)?;
        let poll = config.source.poll.clone();
        let fixtures = Arc::new(FixtureClient::new(source, config.source));
        let synchronizer = TotalsSynchronizer::new(store.clone());
        Ok(Self {
            fixtures,
            store,
            synchronizer,
            policy: VisibilityPolicy::new(config.reveal_at),
            poll,
        })
    }

    /// Resolve the currently active competition stage.
    ///
    /// Playoff phases win while any of their switch dates lie ahead;
    /// otherwise the regular round is taken from the source's current-round
    /// label. A label that cannot be fetched or parsed resolves to round 1,
    /// never to an error.
    pub async fn resolve_current_stage(&self) -> Result<Stage> {
        let mut playoff_matches = Vec::new();
        for phase in prediction_core::PlayoffPhase::ALL {
            let snapshot = self.fixtures.fetch_stage(Stage::Playoff(phase)).await?;
            playoff_matches.extend(snapshot.matches);
        }

        if let Some(phase) = resolve_playoff_stage(&playoff_matches, Utc::now().date_naive()) {
            return Ok(Stage::Playoff(phase));
        }

        let round = match self.fixtures.current_round_label().await {
            Ok(label) => parse_round_label(&label),
            Err(error) => {
                warn!(%error, "current-round label unavailable, defaulting to round 1");
                1
            }
        };
        Ok(Stage::Round(round))
    }

    /// Aggregate one group's leaderboard for one stage from the viewer's
    /// perspective.
    pub async fn build_leaderboard(
        &self,
        group: &Group,
        stage: Stage,
        viewer_id: &str,
        viewer_is_admin: bool,
    ) -> Result<LeaderboardSnapshot> {
        let fixtures = self.fixtures.fetch_stage(stage).await?;

        let mut inputs = LeaderboardInputs {
            matches: fixtures.matches,
            slips: HashMap::new(),
            stage_totals: HashMap::new(),
        };
        for member in &group.members {
            if let Some(slip) = self.store.load_slip(member, stage).await? {
                inputs.slips.insert(member.clone(), slip);
            }
            let totals = self.store.load_stage_totals(member).await?;
            if !totals.is_empty() {
                inputs.stage_totals.insert(member.clone(), totals);
            }
        }

        let viewer = Viewer::new(viewer_id, viewer_is_admin);
        let leaderboard =
            build_leaderboard(group, stage, &inputs, &viewer, &self.policy, Utc::now());
        Ok(LeaderboardSnapshot { leaderboard, freshness: fixtures.freshness })
    }

    /// Submit a batch of predictions for one stage.
    ///
    /// Entries missing a score or referring to matches no longer open are
    /// dropped; the call fails with [`ServiceError::NoEligiblePredictions`]
    /// only when nothing survives the filter, and nothing is written in that
    /// case. Returns the freshly settled stage total.
    pub async fn submit_predictions(
        &self,
        user_id: &str,
        stage: Stage,
        entries: Vec<Prediction>,
    ) -> Result<u32> {
        let fixtures = self.fixtures.fetch_stage(stage).await?;
        let now = Utc::now();
        let view = stage.view();

        let accepted: Vec<Prediction> = entries
            .into_iter()
            .filter(|entry| entry.has_both_scores())
            .filter(|entry| {
                fixtures
                    .matches
                    .iter()
                    .find(|m| m.id == entry.match_id)
                    .map(|m| can_predict(m, view, now))
                    .unwrap_or(false)
            })
            .collect();
        if accepted.is_empty() {
            return Err(ServiceError::NoEligiblePredictions);
        }

        let mut slip = self
            .store
            .load_slip(user_id, stage)
            .await?
            .unwrap_or_else(|| PredictionSlip::new(user_id.to_string(), stage));
        let accepted_count = accepted.len();
        for entry in accepted {
            slip.upsert(entry);
        }
        rescore_slip(&mut slip, &fixtures.matches);
        self.store.save_slip(&slip).await?;

        let total = self
            .synchronizer
            .persist_stage_total(user_id, stage, &slip, &fixtures.matches)
            .await?;
        info!(
            user_id,
            stage = %stage.key(),
            accepted = accepted_count,
            settled = total.settled_points,
            "predictions saved"
        );
        Ok(total.settled_points)
    }

    /// Rebuild every stored total for one user from slips and fixtures.
    ///
    /// Administrative repair entry point; idempotent, and converges to the
    /// same state the incremental path maintains. Stored per-prediction
    /// point values are refreshed along the way.
    pub async fn rebuild_user_totals(&self, user_id: &str) -> Result<AllTimeTotal> {
        let stages = self.store.list_slip_stages(user_id).await?;
        let mut stage_matches = Vec::with_capacity(stages.len());
        for stage in stages {
            let fixtures = self.fixtures.fetch_stage(stage).await?;

            if let Some(mut slip) = self.store.load_slip(user_id, stage).await? {
                rescore_slip(&mut slip, &fixtures.matches);
                self.store.save_slip(&slip).await?;
            }
            stage_matches.push((stage, fixtures.matches));
        }

        let all_time = self
            .synchronizer
            .rebuild_user_totals(user_id, &stage_matches)
            .await?;
        Ok(all_time)
    }

    /// Start live-refresh polling for one stage. The returned handle must be
    /// shut down on teardown; dropping the receiver also stops the task.
    pub fn watch_stage(
        &self,
        stage: Stage,
        buffer: usize,
    ) -> (PollerHandle, mpsc::Receiver<StageFixtures>)
    where
        S: 'static,
    {
        let (tx, rx) = mpsc::channel(buffer);
        let handle = LivePoller::spawn(self.fixtures.clone(), stage, self.poll.clone(), tx);
        (handle, rx)
    }
}
