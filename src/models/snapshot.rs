//! Immutable view of all zones at one point in time.

use chrono::{DateTime, Utc};

use super::Zone;

/// A complete, ordered set of zones produced by one successful refresh.
///
/// Snapshots are never mutated after construction; the store replaces the
/// whole value.
#[derive(Debug, Clone, Default)]
pub struct ZoneSnapshot {
    /// 0 for the initial empty snapshot, incremented on every replace
    pub version: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    zones: Vec<Zone>,
}

impl ZoneSnapshot {
    pub fn new(version: u64, fetched_at: DateTime<Utc>, zones: Vec<Zone>) -> Self {
        Self {
            version,
            fetched_at: Some(fetched_at),
            zones,
        }
    }

    /// Zones in feed order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }
}
