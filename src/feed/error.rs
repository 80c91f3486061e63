//! Error types for fetching and parsing the zone feed.

use thiserror::Error;

/// A whole-feed failure. The store keeps its previous snapshot on any of these.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode feed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed document is missing the `features` collection")]
    MissingFeatures,

    #[error("feed `features` member is not an array")]
    FeaturesNotArray,

    #[error("none of the {0} features in the feed could be parsed")]
    NoValidZones(usize),
}

impl FeedError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FeedError::Request(e) if e.is_timeout())
    }
}

/// A single feature that could not be turned into a zone. The feature is
/// skipped and the rest of the feed is still used.
#[derive(Debug, Error, PartialEq)]
pub enum ZoneParseError {
    #[error("feature has no string `name` property")]
    MissingName,

    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("geometry has no coordinates")]
    MissingCoordinates,

    #[error("unsupported geometry type `{0}`")]
    UnsupportedGeometry(String),

    #[error("invalid coordinate structure: {0}")]
    InvalidStructure(&'static str),

    #[error("invalid position {0}")]
    InvalidPosition(String),

    #[error("position ({lon}, {lat}) is outside WGS84 bounds")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("ring has {0} positions after closing, need at least 4")]
    RingTooShort(usize),

    #[error("polygon has no rings")]
    EmptyPolygon,
}
