//! Document-store trait for slips and totals
//!
//! Semantics are those of a key/value document store: every write is a
//! last-writer-wins replace of one document, keyed by (user, stage) or by
//! user. The one multi-document operation is [`TotalsStore::commit_totals`],
//! which replaces the stage-total and all-time documents as a single batch.

use prediction_core::{AllTimeTotal, PredictionSlip, Stage, StageTotal};

use crate::error::Result;

/// Abstract trait for totals/slip storage backends
#[async_trait::async_trait]
pub trait TotalsStore: Send + Sync {
    /// Load one user's slip for one stage
    async fn load_slip(&self, user_id: &str, stage: Stage) -> Result<Option<PredictionSlip>>;

    /// Replace one user's slip for one stage
    async fn save_slip(&self, slip: &PredictionSlip) -> Result<()>;

    /// Stages the user has a slip stored for
    async fn list_slip_stages(&self, user_id: &str) -> Result<Vec<Stage>>;

    /// Load one stored stage total
    async fn load_stage_total(&self, user_id: &str, stage: Stage) -> Result<Option<StageTotal>>;

    /// Load every stored stage total for a user
    async fn load_stage_totals(&self, user_id: &str) -> Result<Vec<StageTotal>>;

    /// Load the stored all-time total for a user
    async fn load_all_time_total(&self, user_id: &str) -> Result<Option<AllTimeTotal>>;

    /// Replace the stage total and the all-time total as one atomic batch.
    ///
    /// Either both documents are written or neither is; a failure must not
    /// leave the pair inconsistent. Both records must belong to the same
    /// user.
    async fn commit_totals(&self, stage_total: StageTotal, all_time: AllTimeTotal) -> Result<()>;
}
