//! Point-in-polygon zone lookup.

use geo::Contains;
use tracing::trace;

use crate::models::{GeoPoint, Zone, ZoneSnapshot};

/// Find the first zone, in snapshot order, whose polygon contains `point`.
///
/// Containment is planar over (lon, lat) and strict: points on a zone
/// boundary are outside. Overlapping zones are not merged; the earlier one
/// wins. Zones with empty geometry never contain anything.
pub fn locate(point: GeoPoint, snapshot: &ZoneSnapshot) -> Option<&Zone> {
    let p = point.to_point();

    snapshot.iter().find(|zone| {
        if zone.geometry.0.is_empty() {
            trace!(zone = %zone.name, "Zone has no polygons");
            return false;
        }
        zone.geometry.contains(&p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertLevel;
    use chrono::Utc;
    use geo::{polygon, MultiPolygon};
    use serde_json::Map;

    fn zone(name: &str, min: f64, max: f64, alert: AlertLevel) -> Zone {
        Zone {
            name: name.to_string(),
            geometry: MultiPolygon::new(vec![polygon![
                (x: min, y: min),
                (x: min, y: max),
                (x: max, y: max),
                (x: max, y: min),
                (x: min, y: min),
            ]]),
            alert_level: Some(alert),
            properties: Map::new(),
        }
    }

    fn snapshot(zones: Vec<Zone>) -> ZoneSnapshot {
        ZoneSnapshot::new(1, Utc::now(), zones)
    }

    #[test]
    fn test_point_inside_square() {
        let snap = snapshot(vec![zone("X", 0.0, 1.0, AlertLevel::High)]);
        let found = locate(GeoPoint::new(0.5, 0.5), &snap).unwrap();
        assert_eq!(found.name, "X");
    }

    #[test]
    fn test_point_outside_all_zones() {
        let snap = snapshot(vec![
            zone("X", 0.0, 1.0, AlertLevel::High),
            zone("Y", 5.0, 6.0, AlertLevel::Low),
        ]);
        assert!(locate(GeoPoint::new(3.0, 3.0), &snap).is_none());
        assert!(locate(GeoPoint::new(0.5, 0.5), &ZoneSnapshot::default()).is_none());
    }

    #[test]
    fn test_boundary_is_outside() {
        let snap = snapshot(vec![zone("X", 0.0, 1.0, AlertLevel::High)]);
        assert!(locate(GeoPoint::new(0.0, 0.5), &snap).is_none());
        assert!(locate(GeoPoint::new(1.0, 1.0), &snap).is_none());
    }

    #[test]
    fn test_first_overlapping_zone_wins() {
        let snap = snapshot(vec![
            zone("Big", 0.0, 10.0, AlertLevel::Low),
            zone("Small", 4.0, 6.0, AlertLevel::High),
        ]);
        assert_eq!(locate(GeoPoint::new(5.0, 5.0), &snap).unwrap().name, "Big");

        let reversed = snapshot(vec![
            zone("Small", 4.0, 6.0, AlertLevel::High),
            zone("Big", 0.0, 10.0, AlertLevel::Low),
        ]);
        assert_eq!(
            locate(GeoPoint::new(5.0, 5.0), &reversed).unwrap().name,
            "Small"
        );
    }

    #[test]
    fn test_hole_is_not_contained() {
        let donut = Zone {
            name: "Donut".to_string(),
            geometry: MultiPolygon::new(vec![polygon!(
                exterior: [
                    (x: 0.0, y: 0.0),
                    (x: 0.0, y: 4.0),
                    (x: 4.0, y: 4.0),
                    (x: 4.0, y: 0.0),
                    (x: 0.0, y: 0.0),
                ],
                interiors: [[
                    (x: 1.0, y: 1.0),
                    (x: 1.0, y: 3.0),
                    (x: 3.0, y: 3.0),
                    (x: 3.0, y: 1.0),
                    (x: 1.0, y: 1.0),
                ]],
            )]),
            alert_level: None,
            properties: Map::new(),
        };
        let snap = snapshot(vec![donut]);
        assert!(locate(GeoPoint::new(2.0, 2.0), &snap).is_none());
        assert!(locate(GeoPoint::new(0.5, 0.5), &snap).is_some());
    }

    #[test]
    fn test_empty_geometry_is_skipped() {
        let empty = Zone {
            name: "Empty".to_string(),
            geometry: MultiPolygon::new(vec![]),
            alert_level: Some(AlertLevel::High),
            properties: Map::new(),
        };
        let snap = snapshot(vec![empty, zone("X", 0.0, 1.0, AlertLevel::High)]);
        assert_eq!(locate(GeoPoint::new(0.5, 0.5), &snap).unwrap().name, "X");
    }

    #[test]
    fn test_locate_is_idempotent() {
        let snap = snapshot(vec![
            zone("A", 0.0, 2.0, AlertLevel::Low),
            zone("B", 1.0, 3.0, AlertLevel::High),
        ]);
        let p = GeoPoint::new(1.5, 1.5);
        let first = locate(p, &snap).map(|z| z as *const Zone);
        let second = locate(p, &snap).map(|z| z as *const Zone);
        assert_eq!(first, second);
    }
}
