//! Periodic zone refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::ZoneStore;
use crate::feed::ZoneSource;

/// Triggers [`ZoneStore::refresh`] on a fixed interval.
///
/// The scheduler only owns the trigger. The initial fetch is expected to
/// have happened already, so the first refresh fires one interval after
/// [`start`](Self::start).
pub struct RefreshScheduler {
    store: Arc<ZoneStore>,
    source: Arc<dyn ZoneSource>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(store: Arc<ZoneStore>, source: Arc<dyn ZoneSource>, interval: Duration) -> Self {
        Self {
            store,
            source,
            interval,
        }
    }

    /// Start the refresh loop as an async task. Abort the handle to stop it.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        info!(
            interval_secs = self.interval.as_secs(),
            source = %self.source.describe(),
            "Zone refresh scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.store.refresh(self.source.as_ref()).await;
        }
    }
}
