//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use featurejoin::{Feature, FeatureCollection};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom}, series::Series};

/// Columns derived from point coordinates.
pub const LNG_COLUMN: &str = "lng";
pub const LAT_COLUMN: &str = "lat";

const LINE_TERMINATOR: &str = "\r\n";

/// Output header for `collection`.
///
/// The ordered union of property keys across all features, followed by
/// `lng`/`lat` when any feature is a point.  An empty collection uses
/// `fallback` instead.
pub fn output_columns(collection: &FeatureCollection, fallback: &[String]) -> Vec<String> {
    if collection.is_empty() {
        return fallback.to_vec();
    }

    let mut columns: Vec<String> = Vec::new();
    for feature in collection {
        for key in feature.properties.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    if collection.iter().any(Feature::is_point) {
        for extra in [LNG_COLUMN, LAT_COLUMN] {
            if !columns.iter().any(|c| c == extra) {
                columns.push(extra.to_string());
            }
        }
    }
    columns
}

/// The cell for `column` in `feature`'s output row.
///
/// Point features report their own coordinates under `lng`/`lat`; null and
/// missing properties render empty.
fn cell(feature: &Feature, column: &str) -> Option<String> {
    if let Some(coord) = feature.point_coords() {
        match column {
            LNG_COLUMN => return Some(coord.x.to_string()),
            LAT_COLUMN => return Some(coord.y.to_string()),
            _ => {}
        }
    }
    feature.properties.get(column)
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Flatten a feature collection into a string-typed DataFrame, one row per feature.
pub fn features_to_dataframe(collection: &FeatureCollection, fallback: &[String]) -> Result<DataFrame> {
    let columns = output_columns(collection, fallback)
        .iter()
        .map(|name| {
            let values = collection.iter()
                .map(|feature| cell(feature, name))
                .collect::<Vec<Option<String>>>();
            Series::new(name.as_str().into(), values).into()
        })
        .collect::<Vec<Column>>();

    DataFrame::new(columns)
        .context("[io::csv::write] Failed to assemble output table")
}

/// Write a DataFrame to a CSV file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .with_line_terminator(LINE_TERMINATOR.to_string())
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write a DataFrame to a CSV string.
pub fn write_csv_string(df: &mut DataFrame) -> Result<String> {
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_line_terminator(LINE_TERMINATOR.to_string())
        .finish(df)
        .with_context(|| "[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .with_context(|| "[io::csv::write] CSV output is not valid UTF-8")
}
