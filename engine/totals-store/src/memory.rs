//! In-memory totals store (for testing)

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use prediction_core::{AllTimeTotal, PredictionSlip, Stage, StageTotal};
use tokio::sync::Mutex;

use crate::error::{Result, StoreError};
use crate::store::TotalsStore;

#[derive(Default)]
struct State {
    slips: HashMap<(String, Stage), PredictionSlip>,
    stage_totals: HashMap<(String, Stage), StageTotal>,
    all_time: HashMap<String, AllTimeTotal>,
}

/// In-memory totals store backend.
///
/// The whole state sits behind one mutex, so `commit_totals` is trivially
/// atomic. `fail_next_commit` injects a batch failure before anything is
/// written, to exercise the all-or-nothing guarantee in tests.
pub struct MemoryTotalsStore {
    state: Mutex<State>,
    fail_next_commit: AtomicBool,
}

impl MemoryTotalsStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()), fail_next_commit: AtomicBool::new(false) }
    }

    /// Make the next `commit_totals` call fail without writing either half
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }
}

impl Default for MemoryTotalsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TotalsStore for MemoryTotalsStore {
    async fn load_slip(&self, user_id: &str, stage: Stage) -> Result<Option<PredictionSlip>> {
        let state = self.state.lock().await;
        Ok(state.slips.get(&(user_id.to_string(), stage)).cloned())
    }

    async fn save_slip(&self, slip: &PredictionSlip) -> Result<()> {
        let mut state = self.state.lock().await;
        state.slips.insert((slip.user_id.clone(), slip.stage), slip.clone());
        Ok(())
    }

    async fn list_slip_stages(&self, user_id: &str) -> Result<Vec<Stage>> {
        let state = self.state.lock().await;
        let mut stages: Vec<Stage> = state
            .slips
            .keys()
            .filter(|(user, _)| user == user_id)
            .map(|(_, stage)| *stage)
            .collect();
        stages.sort_by_key(|stage| stage.key());
        Ok(stages)
    }

    async fn load_stage_total(&self, user_id: &str, stage: Stage) -> Result<Option<StageTotal>> {
        let state = self.state.lock().await;
        Ok(state.stage_totals.get(&(user_id.to_string(), stage)).cloned())
    }

    async fn load_stage_totals(&self, user_id: &str) -> Result<Vec<StageTotal>> {
        let state = self.state.lock().await;
        let mut totals: Vec<StageTotal> = state
            .stage_totals
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|(_, total)| total.clone())
            .collect();
        totals.sort_by_key(|total| total.stage.key());
        Ok(totals)
    }

    async fn load_all_time_total(&self, user_id: &str) -> Result<Option<AllTimeTotal>> {
        let state = self.state.lock().await;
        Ok(state.all_time.get(user_id).cloned())
    }

    async fn commit_totals(&self, stage_total: StageTotal, all_time: AllTimeTotal) -> Result<()> {
        if stage_total.user_id != all_time.user_id {
            return Err(StoreError::batch_failed(
                "stage total and all-time total belong to different users",
            ));
        }
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::batch_failed("injected commit failure"));
        }

        // both writes under one lock hold: readers never see half the batch
        let mut state = self.state.lock().await;
        state
            .stage_totals
            .insert((stage_total.user_id.clone(), stage_total.stage), stage_total);
        state.all_time.insert(all_time.user_id.clone(), all_time);
        Ok(())
    }
}
