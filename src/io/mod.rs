//! IO module for format-specific reading and writing operations.
//!
//! # Format Modules
//!
//! - `csv` - delimited text in, delimited text out
//! - `wkt` - Well-Known Text geometry parsing
//! - `geojson` - GeoJSON FeatureCollection export

pub mod csv;
pub mod geojson;
pub mod wkt;
