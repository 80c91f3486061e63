//! Nearest safe-zone ranking.

use geo::{Centroid, Distance, Geodesic};
use tracing::warn;

use crate::models::{GeoPoint, SafeZoneResult, Zone, ZoneSnapshot};

/// Low-alert zones ranked by distance from `point` to each zone's centroid.
///
/// `exclude` is compared by identity, not by value. Zones whose centroid or
/// distance cannot be computed are logged and left out. Ties keep snapshot
/// order.
pub fn nearby_safe_zones(
    point: GeoPoint,
    exclude: Option<&Zone>,
    snapshot: &ZoneSnapshot,
) -> Vec<SafeZoneResult> {
    let mut results: Vec<SafeZoneResult> = snapshot
        .iter()
        .filter(|zone| zone.is_low_alert())
        .filter(|zone| !exclude.is_some_and(|ex| std::ptr::eq(ex, *zone)))
        .filter_map(|zone| {
            let Some(center) = zone.geometry.centroid() else {
                warn!(zone = %zone.name, "Safe zone has no centroid, skipping");
                return None;
            };
            let center = GeoPoint::from(center);

            let distance_km = distance_km(point, center);
            if !distance_km.is_finite() {
                warn!(
                    zone = %zone.name,
                    lat = center.lat,
                    lon = center.lon,
                    "Safe zone distance is not finite, skipping"
                );
                return None;
            }

            Some(SafeZoneResult {
                name: zone.name.clone(),
                distance_km,
                center,
                properties: zone.properties.clone(),
            })
        })
        .collect();

    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}

/// Geodesic (WGS84 ellipsoid) distance in kilometers
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    Geodesic.distance(from.to_point(), to.to_point()) / 1000.0
}
