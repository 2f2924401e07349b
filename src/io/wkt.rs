//! WKT geometry parsing.

use geo::Geometry;
use ::wkt::TryFromWkt;

/// Parse a WKT string into a geometry.
///
/// Returns `None` for empty or malformed text; callers drop such rows.
pub fn parse_wkt(text: &str) -> Option<Geometry<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match Geometry::<f64>::try_from_wkt_str(text) {
        Ok(geometry) => Some(geometry),
        Err(e) => {
            tracing::debug!(error = %e, "[io::wkt] unparseable geometry");
            None
        }
    }
}
