//! Haven - hazard-zone lookup service
//!
//! This library provides the zone store, feed parsing and geometric queries
//! shared by the `server` and `check` binaries.

pub mod config;
pub mod feed;
pub mod models;
pub mod query;
pub mod store;

pub use models::{AlertLevel, GeoPoint, SafeZoneResult, Zone, ZoneSnapshot};
pub use query::{assess, locate, nearby_safe_zones, Assessment};
pub use store::{RefreshOutcome, RefreshScheduler, ZoneStore};
