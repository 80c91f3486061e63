//! In-memory zone store with atomic snapshot replacement.
//!
//! Readers clone an `Arc<ZoneSnapshot>` and keep working on it for as long
//! as they need; a refresh builds the next snapshot off to the side and
//! swaps the pointer. A reader therefore sees either the old or the new
//! snapshot in full, never a mix.

mod scheduler;

pub use scheduler::RefreshScheduler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::feed::{parse_feature_collection, FeedError, ZoneSource};
use crate::models::{Zone, ZoneSnapshot};

/// Result of a single refresh attempt
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new snapshot was installed
    Updated {
        version: u64,
        zones: usize,
        skipped: usize,
    },
    /// The fetch failed; the previous snapshot is still current
    Retained(FeedError),
    /// Another refresh was already running
    Skipped,
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

/// Holds the current zone snapshot
pub struct ZoneStore {
    current: RwLock<Arc<ZoneSnapshot>>,
    refreshing: AtomicBool,
}

impl ZoneStore {
    /// Create a store holding the empty version-0 snapshot
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ZoneSnapshot::default())),
            refreshing: AtomicBool::new(false),
        }
    }

    /// The current snapshot. Holding the returned `Arc` pins that version.
    pub fn current(&self) -> Arc<ZoneSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Fetch the feed from `source` and replace the snapshot.
    ///
    /// Never fails: feed errors are logged and the previous snapshot is kept.
    /// Concurrent calls are not queued; a call that finds a refresh already
    /// running returns [`RefreshOutcome::Skipped`].
    pub async fn refresh(&self, source: &dyn ZoneSource) -> RefreshOutcome {
        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            debug!("Zone refresh already in progress, skipping");
            return RefreshOutcome::Skipped;
        };

        let started = Instant::now();
        let parsed = match source.fetch().await {
            Ok(doc) => parse_feature_collection(&doc),
            Err(e) => Err(e),
        };

        match parsed {
            Ok(parsed) => {
                let zones = parsed.zones.len();
                let version = self.replace(parsed.zones);
                info!(
                    version,
                    zones,
                    skipped = parsed.skipped,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Zones updated from {}",
                    source.describe()
                );
                RefreshOutcome::Updated {
                    version,
                    zones,
                    skipped: parsed.skipped,
                }
            }
            Err(e) => {
                let kept = self.current();
                if e.is_timeout() {
                    warn!(
                        version = kept.version,
                        zones = kept.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Zone feed {} timed out, keeping previous snapshot",
                        source.describe()
                    );
                } else {
                    warn!(
                        version = kept.version,
                        zones = kept.len(),
                        "Zone refresh from {} failed, keeping previous snapshot: {}",
                        source.describe(),
                        e
                    );
                }
                RefreshOutcome::Retained(e)
            }
        }
    }

    fn replace(&self, zones: Vec<Zone>) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version + 1;
        *current = Arc::new(ZoneSnapshot::new(version, Utc::now(), zones));
        version
    }
}

impl Default for ZoneStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the in-progress flag when dropped, including on cancellation
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
