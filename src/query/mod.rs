//! Geometric queries against a zone snapshot.
//!
//! Everything here is a pure function of the query point and the snapshot
//! it is given; nothing touches the store.

mod locate;
mod safe_zones;

pub use locate::locate;
pub use safe_zones::{distance_km, nearby_safe_zones};

use tracing::debug;

use crate::models::{GeoPoint, SafeZoneResult, Zone, ZoneSnapshot};

/// Where a point falls relative to the zone set
#[derive(Debug)]
pub enum Assessment<'a> {
    /// Inside a high-alert zone, with safe zones ranked by distance
    HighAlert {
        zone: &'a Zone,
        safe_zones: Vec<SafeZoneResult>,
    },
    /// Inside a zone whose alert level is anything but high
    InZone { zone: &'a Zone },
    /// Inside no zone at all
    Outside,
}

/// Locate `point` and, for high-alert zones, rank the nearby safe zones
pub fn assess(point: GeoPoint, snapshot: &ZoneSnapshot) -> Assessment<'_> {
    let assessment = match locate(point, snapshot) {
        Some(zone) if zone.is_high_alert() => Assessment::HighAlert {
            zone,
            safe_zones: nearby_safe_zones(point, Some(zone), snapshot),
        },
        Some(zone) => Assessment::InZone { zone },
        None => Assessment::Outside,
    };

    debug!(
        "Assessed ({}, {}) against snapshot v{}: {}",
        point.lat,
        point.lon,
        snapshot.version,
        match &assessment {
            Assessment::HighAlert { zone, .. } => format!("high alert in {}", zone.name),
            Assessment::InZone { zone } => format!(
                "in {} (alert level {})",
                zone.name,
                zone.alert_level
                    .as_ref()
                    .map_or_else(|| "none".to_string(), ToString::to_string)
            ),
            Assessment::Outside => "outside".to_string(),
        }
    );

    assessment
}
