//! GeoJSON export of a joined feature collection.

use anyhow::{Context, Result};
use featurejoin::FeatureCollection;
use geo::{Coord, Geometry, LineString, Polygon};
use serde_json::{json, Map, Value};

/// Export a feature collection as a GeoJSON FeatureCollection.
/// Properties keep their insertion order as strings; null stays null.
pub fn features_to_geojson(collection: &FeatureCollection) -> Value {
    let features = collection.iter()
        .map(|feature| {
            let properties = feature.properties.iter()
                .map(|(key, value)| {
                    let value = value.as_str().map_or(Value::Null, |s| json!(s));
                    (key.to_string(), value)
                })
                .collect::<Map<String, Value>>();

            json!({
                "type": "Feature",
                "id": feature.id.0,
                "geometry": geometry_to_geojson(&feature.geometry),
                "properties": properties,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Serialize a feature collection as a pretty-printed GeoJSON string.
pub fn write_geojson_string(collection: &FeatureCollection) -> Result<String> {
    serde_json::to_string_pretty(&features_to_geojson(collection))
        .context("[io::geojson] Failed to serialize GeoJSON")
}

fn coord(c: &Coord<f64>) -> Value { json!([c.x, c.y]) }

fn line_coords(ls: &LineString<f64>) -> Value {
    Value::Array(ls.coords().map(coord).collect())
}

fn polygon_coords(polygon: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(line_coords)
            .collect()
    )
}

/// Convert a geometry to its GeoJSON object.
pub fn geometry_to_geojson(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": coord(&p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.iter().map(|p| coord(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(line) => json!({
            "type": "LineString",
            "coordinates": [coord(&line.start), coord(&line.end)],
        }),
        Geometry::LineString(ls) => json!({ "type": "LineString", "coordinates": line_coords(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.iter().map(line_coords).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(polygon) => json!({ "type": "Polygon", "coordinates": polygon_coords(polygon) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.iter().map(polygon_coords).collect::<Vec<_>>(),
        }),
        Geometry::Rect(rect) => json!({ "type": "Polygon", "coordinates": polygon_coords(&rect.to_polygon()) }),
        Geometry::Triangle(tri) => json!({ "type": "Polygon", "coordinates": polygon_coords(&tri.to_polygon()) }),
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.iter().map(geometry_to_geojson).collect::<Vec<_>>(),
        }),
    }
}
