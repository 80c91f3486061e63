//! GeoJSON FeatureCollection → zones.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{FeedError, ZoneParseError};
use crate::models::{AlertLevel, Zone};

/// Zones extracted from one feed document
#[derive(Debug)]
pub struct ParsedFeed {
    pub zones: Vec<Zone>,
    /// Number of features that were skipped as malformed
    pub skipped: usize,
}

/// Parse a FeatureCollection document.
///
/// Malformed features are logged and skipped. The document as a whole is
/// rejected only when the `features` collection is absent, or when it is
/// non-empty and not a single feature parses.
pub fn parse_feature_collection(doc: &Value) -> Result<ParsedFeed, FeedError> {
    let features = doc
        .get("features")
        .ok_or(FeedError::MissingFeatures)?
        .as_array()
        .ok_or(FeedError::FeaturesNotArray)?;

    let mut zones = Vec::with_capacity(features.len());
    let mut skipped = 0;

    for (idx, feature) in features.iter().enumerate() {
        match parse_feature(feature) {
            Ok(zone) => zones.push(zone),
            Err(e) => {
                let name = feature
                    .get("properties")
                    .and_then(|p| p.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("<unnamed>");
                warn!(feature = idx, name, "Skipping malformed zone: {}", e);
                skipped += 1;
            }
        }
    }

    if zones.is_empty() && !features.is_empty() {
        return Err(FeedError::NoValidZones(features.len()));
    }

    debug!("Parsed {} zones ({} skipped)", zones.len(), skipped);

    Ok(ParsedFeed { zones, skipped })
}

/// Parse one GeoJSON feature into a zone
pub fn parse_feature(feature: &Value) -> Result<Zone, ZoneParseError> {
    let properties: Map<String, Value> = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let name = properties
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ZoneParseError::MissingName)?
        .to_string();

    let alert_level = properties
        .get("alert_level")
        .and_then(AlertLevel::from_property);

    let geometry = feature
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or(ZoneParseError::MissingGeometry)?;

    Ok(Zone {
        name,
        geometry: parse_geometry(geometry)?,
        alert_level,
        properties,
    })
}

/// Parse a `Polygon` or `MultiPolygon` geometry object
pub fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>, ZoneParseError> {
    let geo_type = geometry.get("type").and_then(Value::as_str).unwrap_or("");
    let coordinates = geometry
        .get("coordinates")
        .ok_or(ZoneParseError::MissingCoordinates)?;

    match geo_type {
        "Polygon" => Ok(MultiPolygon::new(vec![parse_polygon(coordinates)?])),
        "MultiPolygon" => {
            let polygons = coordinates
                .as_array()
                .ok_or(ZoneParseError::InvalidStructure(
                    "multi-polygon is not an array of polygons",
                ))?
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>, _>>()?;

            if polygons.is_empty() {
                return Err(ZoneParseError::EmptyPolygon);
            }
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(ZoneParseError::UnsupportedGeometry(other.to_string())),
    }
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, ZoneParseError> {
    let rings = value.as_array().ok_or(ZoneParseError::InvalidStructure(
        "polygon is not an array of rings",
    ))?;

    let (exterior, interiors) = rings.split_first().ok_or(ZoneParseError::EmptyPolygon)?;

    let exterior = parse_ring(exterior)?;
    let interiors = interiors
        .iter()
        .map(parse_ring)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a linear ring, closing it if the feed left it open
fn parse_ring(value: &Value) -> Result<LineString<f64>, ZoneParseError> {
    let positions = value.as_array().ok_or(ZoneParseError::InvalidStructure(
        "ring is not an array of positions",
    ))?;

    let mut ring = positions
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }

    if ring.len() < 4 {
        return Err(ZoneParseError::RingTooShort(ring.len()));
    }

    Ok(LineString::new(ring))
}

/// `[lon, lat]` or `[lon, lat, alt]`
fn parse_position(value: &Value) -> Result<Coord<f64>, ZoneParseError> {
    let invalid = || ZoneParseError::InvalidPosition(value.to_string());

    let parts = value.as_array().ok_or_else(invalid)?;
    if parts.len() < 2 {
        return Err(invalid());
    }

    let x = parts[0].as_f64().ok_or_else(invalid)?;
    let y = parts[1].as_f64().ok_or_else(invalid)?;

    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    if !(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y) {
        return Err(ZoneParseError::OutOfRange { lon: x, lat: y });
    }

    Ok(Coord { x, y })
}
