//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use featurejoin::{FeatureCollection, Properties, PropertyValue};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, StringChunked}};

use crate::io::wkt::parse_wkt;

/// Column that always supplies a fallback geometry and never becomes a property.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Features read from one delimited file.
#[derive(Debug)]
pub struct FeatureTable {
    /// Property columns in file order (without `geometry`).
    pub columns: Vec<String>,
    pub features: FeatureCollection,
    /// Rows dropped because their geometry could not be parsed.
    pub skipped: usize,
}

/// Reads a delimited file from `path` into a Polars DataFrame, every column as a string.
pub fn read_csv(path: &Path, delimiter: u8) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(delimiter))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads delimited text from a string, every column as a string.
pub fn read_csv_string(csv: &str, delimiter: u8) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(delimiter))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes()))
        .finish()
        .with_context(|| "[io::csv::read] Failed to read CSV from string")
}

/// Reads a delimited file and converts its rows into features.
pub fn read_feature_table(path: &Path, wkt_field: &str, delimiter: u8) -> Result<FeatureTable> {
    let df = read_csv(path, delimiter)?;
    let table = features_from_dataframe(&df, wkt_field)
        .with_context(|| format!("[io::csv::read] Failed to build features from {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        features = table.features.len(),
        skipped = table.skipped,
        "loaded feature table"
    );
    Ok(table)
}

/// Converts string-typed rows into features.
///
/// The geometry comes from `wkt_field`, falling back to the `geometry` column
/// when that cell is missing or empty.  Rows without a parseable geometry are
/// skipped.  The `geometry` column itself is not kept as a property.
pub fn features_from_dataframe(df: &DataFrame, wkt_field: &str) -> Result<FeatureTable> {
    let names = df.get_column_names().into_iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    let columns = df.get_columns().iter()
        .map(|col| col.str())
        .collect::<Result<Vec<&StringChunked>, _>>()
        .context("[io::csv::read] Expected every column to be read as a string")?;

    let wkt_col = names.iter().position(|name| name == wkt_field);
    let geom_col = names.iter().position(|name| name == GEOMETRY_COLUMN);
    if wkt_col.is_none() && geom_col.is_none() {
        tracing::warn!(wkt_field, "[io::csv::read] no WKT column found; every row will be skipped");
    }

    let mut features = FeatureCollection::with_capacity(df.height());
    let mut skipped = 0;

    for row in 0..df.height() {
        let text = [wkt_col, geom_col].into_iter()
            .flatten()
            .filter_map(|col| columns[col].get(row))
            .find(|text| !text.trim().is_empty());

        let Some(geometry) = text.and_then(parse_wkt) else {
            tracing::debug!(row, "[io::csv::read] skipping row without a valid geometry");
            skipped += 1;
            continue;
        };

        let properties = names.iter().zip(&columns)
            .filter(|(name, _)| name.as_str() != GEOMETRY_COLUMN)
            .map(|(name, col)| (name.as_str(), PropertyValue::from(col.get(row))))
            .collect::<Properties>();

        features.insert(geometry, properties);
    }

    let columns = names.into_iter()
        .filter(|name| name != GEOMETRY_COLUMN)
        .collect();

    Ok(FeatureTable { columns, features, skipped })
}
