//! Live-refresh polling
//!
//! While a stage has matches in progress the poller re-fetches it on a fast
//! cadence; otherwise it backs off to the slow one. The handle must be shut
//! down on view teardown so the timer task does not leak.

use std::sync::Arc;

use prediction_core::Stage;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::{FixtureClient, StageFixtures};
use crate::config::PollConfig;
use crate::source::FixtureSource;

/// Handle to a running live poller
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the polling task and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawner for live-refresh polling tasks
pub struct LivePoller;

impl LivePoller {
    /// Start polling one stage, delivering each snapshot on `updates`.
    ///
    /// The cadence adapts per snapshot: the fast interval while any match in
    /// the stage is live, the slow one otherwise.
    pub fn spawn<S: FixtureSource + 'static>(
        client: Arc<FixtureClient<S>>,
        stage: Stage,
        config: PollConfig,
        updates: mpsc::Sender<StageFixtures>,
    ) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            info!(stage = %stage.key(), "live poller started");
            let mut interval = config.idle_interval;

            loop {
                match client.fetch_stage(stage).await {
                    Ok(snapshot) => {
                        let any_live =
                            snapshot.matches.iter().any(|m| m.status.is_live());
                        interval = if any_live {
                            config.live_interval
                        } else {
                            config.idle_interval
                        };
                        if updates.send(snapshot).await.is_err() {
                            // receiver dropped, nothing left to refresh for
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(stage = %stage.key(), %error, "live refresh failed");
                    }
                }

                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!(stage = %stage.key(), "live poller stopped");
        });

        PollerHandle { shutdown: shutdown_tx, task }
    }
}
