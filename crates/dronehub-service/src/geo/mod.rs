//! Geo-metadata extraction from tabular geo-position files.

pub mod extractor;
pub mod parse;

pub use extractor::GeoMetadataExtractor;
pub use parse::{GeoSummary, parse_geo_summary};
