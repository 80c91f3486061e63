//! Zone feed: fetching GeoJSON documents and parsing them into zones.

mod error;
mod parse;
mod source;

pub use error::{FeedError, ZoneParseError};
pub use parse::{parse_feature, parse_feature_collection, parse_geometry, ParsedFeed};
pub use source::{source_for_location, FileZoneSource, HttpZoneSource, ZoneSource};
