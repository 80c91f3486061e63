//! Hazard zone types.

use geo::{MultiPolygon, Point};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Alert level attached to a zone via its `alert_level` property.
///
/// Only `"low"` and `"high"` drive behaviour; anything else is carried
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertLevel {
    Low,
    High,
    Other(String),
}

impl AlertLevel {
    /// Interpret a raw `alert_level` property value.
    ///
    /// Matching is exact and case-sensitive. Non-string values are kept as
    /// their JSON text.
    pub fn from_property(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::from(s.as_str())),
            other => Some(AlertLevel::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AlertLevel::Low => "low",
            AlertLevel::High => "high",
            AlertLevel::Other(s) => s,
        }
    }
}

impl From<&str> for AlertLevel {
    fn from(s: &str) -> Self {
        match s {
            "low" => AlertLevel::Low,
            "high" => AlertLevel::High,
            other => AlertLevel::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AlertLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Geographic point (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar point with x = longitude, y = latitude
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        Self {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

/// A named hazard zone parsed from one feed feature.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    /// Polygon rings in (lon, lat) order. Simple polygons are stored as a
    /// single-member multi-polygon.
    pub geometry: MultiPolygon<f64>,
    pub alert_level: Option<AlertLevel>,
    /// Full feature properties, `name` and `alert_level` included.
    pub properties: Map<String, Value>,
}

impl Zone {
    pub fn is_high_alert(&self) -> bool {
        self.alert_level == Some(AlertLevel::High)
    }

    pub fn is_low_alert(&self) -> bool {
        self.alert_level == Some(AlertLevel::Low)
    }
}

/// A low-alert zone ranked by distance from a query point.
#[derive(Debug, Clone, Serialize)]
pub struct SafeZoneResult {
    pub name: String,
    pub distance_km: f64,
    pub center: GeoPoint,
    pub properties: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_level_is_case_sensitive() {
        assert_eq!(AlertLevel::from("low"), AlertLevel::Low);
        assert_eq!(AlertLevel::from("high"), AlertLevel::High);
        assert_eq!(
            AlertLevel::from("HIGH"),
            AlertLevel::Other("HIGH".to_string())
        );
    }

    #[test]
    fn test_alert_level_from_property() {
        assert_eq!(AlertLevel::from_property(&Value::Null), None);
        assert_eq!(
            AlertLevel::from_property(&json!("medium")),
            Some(AlertLevel::Other("medium".to_string()))
        );
        assert_eq!(
            AlertLevel::from_property(&json!(3)),
            Some(AlertLevel::Other("3".to_string()))
        );
    }

    #[test]
    fn test_geo_point_axis_order() {
        let p = GeoPoint::new(10.0, 20.0).to_point();
        assert_eq!(p.x(), 20.0);
        assert_eq!(p.y(), 10.0);
        assert_eq!(GeoPoint::from(p), GeoPoint::new(10.0, 20.0));
    }
}
