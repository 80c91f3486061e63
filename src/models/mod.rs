//! Core data models for the hazard-zone service.

pub mod snapshot;
pub mod zone;

pub use snapshot::ZoneSnapshot;
pub use zone::{AlertLevel, GeoPoint, SafeZoneResult, Zone};
