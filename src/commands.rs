use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use featurejoin::{spatial_join, FeatureCollection, GeoOracle, JoinOptions, NullValues};

use crate::cli::{Cli, OutputFormat};
use crate::common::{ensure_parent_dir_exists, ensure_writable, require_file_exists};
use crate::io::csv::{features_to_dataframe, read_feature_table, write_csv, write_csv_string};
use crate::io::geojson::write_geojson_string;

/// Build the join options described by the command line.
pub fn join_options(cli: &Cli) -> JoinOptions {
    let fields = cli.fields.iter()
        .map(|field| field.trim().to_string())
        .collect::<Vec<_>>();
    JoinOptions::new(fields)
        .with_reverse(cli.reverse)
        .with_nulls(if cli.skip_null { NullValues::Skip } else { NullValues::Accumulate })
}

/// Header used when the joined collection has no features: the receiving
/// table's columns followed by any configured field it lacks.
fn fallback_columns(columns: &[String], fields: &[String]) -> Vec<String> {
    let mut out = columns.to_vec();
    for field in fields {
        if !out.contains(field) {
            out.push(field.clone());
        }
    }
    out
}

/// Render the joined collection in the requested format.
pub fn render(collection: &FeatureCollection, fallback: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => {
            let mut df = features_to_dataframe(collection, fallback)?;
            write_csv_string(&mut df)
        }
        OutputFormat::Geojson => write_geojson_string(collection),
    }
}

/// Write the joined collection to `path`, creating its parent directory.
pub fn write_output(collection: &FeatureCollection, fallback: &[String], format: OutputFormat, path: &Path) -> Result<()> {
    ensure_parent_dir_exists(path)?;
    match format {
        OutputFormat::Csv => {
            let mut df = features_to_dataframe(collection, fallback)?;
            write_csv(&mut df, path)
        }
        OutputFormat::Geojson => {
            let text = write_geojson_string(collection)?;
            std::fs::write(path, text)
                .with_context(|| format!("[commands] Failed to write output to {}", path.display()))
        }
    }
}

/// Read both inputs, join them, and write the receiving side.
pub fn run(cli: &Cli) -> Result<()> {
    require_file_exists(&cli.polyfile)?;
    require_file_exists(&cli.coordinatesfile)?;
    if !cli.delimiter.is_ascii() {
        bail!("[commands] Delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }
    let delimiter = cli.delimiter as u8;

    if let Some(output) = &cli.output {
        ensure_writable(output, cli.force)?;
    }

    let polygons = read_feature_table(&cli.polyfile, &cli.polyfile_wkt_field, delimiter)?;
    let points = read_feature_table(&cli.coordinatesfile, &cli.pointfile_wkt_field, delimiter)?;

    let options = join_options(cli);
    let receiving_columns = if options.reverse { &polygons.columns } else { &points.columns };
    let fallback = fallback_columns(receiving_columns, &options.fields);

    let outcome = spatial_join(points.features, polygons.features, &options, &GeoOracle)
        .context("[commands] Spatial join failed")?;

    if !outcome.errors.is_empty() {
        for error in &outcome.errors {
            tracing::error!(%error, "join error");
        }
        bail!("[commands] Spatial join reported {} error(s)", outcome.errors.len());
    }

    tracing::info!(
        features = outcome.collection.len(),
        matches = outcome.matches,
        reverse = options.reverse,
        "join complete"
    );

    match &cli.output {
        Some(path) => {
            write_output(&outcome.collection, &fallback, cli.format, path)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            let rendered = render(&outcome.collection, &fallback, cli.format)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .context("[commands] Failed to write output to stdout")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn options_follow_flags() {
        let cli = Cli::try_parse_from([
            "wktlink", "-p", "a.csv", "-c", "b.csv", "-f", "GEOID, NAME", "-r", "--skip-null",
        ]).unwrap();
        let options = join_options(&cli);
        assert_eq!(options.fields, vec!["GEOID", "NAME"]);
        assert!(options.reverse);
        assert_eq!(options.nulls, NullValues::Skip);
    }

    #[test]
    fn fallback_appends_missing_fields() {
        let columns = vec!["name".to_string(), "GEOID".to_string()];
        let fields = vec!["GEOID".to_string(), "TRACT".to_string()];
        assert_eq!(fallback_columns(&columns, &fields), vec!["name", "GEOID", "TRACT"]);
    }

    const POLYGONS: &str = "GEOID,geometry\nA,\"POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))\"\n";
    const POINTS: &str = "Name,geometry\nX,POINT(1 1)\n";

    fn inputs(dir: &Path) -> (String, String) {
        let polys = dir.join("polys.csv");
        let points = dir.join("points.csv");
        std::fs::write(&polys, POLYGONS).unwrap();
        std::fs::write(&points, POINTS).unwrap();
        (polys.display().to_string(), points.display().to_string())
    }

    #[test]
    fn failed_join_leaves_no_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (polys, points) = inputs(dir.path());
        let output = dir.path().join("nested/out.csv");
        let cli = Cli::try_parse_from([
            "wktlink", "-p", &polys, "-c", &points, "-f", " ", "-o", output.to_str().unwrap(),
        ]).unwrap();

        assert!(run(&cli).is_err());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn csv_output_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (polys, points) = inputs(dir.path());
        let output = dir.path().join("nested/out.csv");
        let cli = Cli::try_parse_from([
            "wktlink", "-p", &polys, "-c", &points, "-o", output.to_str().unwrap(),
        ]).unwrap();

        run(&cli).unwrap();
        let csv = std::fs::read_to_string(&output).unwrap();
        assert!(csv.starts_with("Name,GEOID,lng,lat\r\nX,A,1,1"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let cli = Cli::try_parse_from([
            "wktlink", "-p", missing.to_str().unwrap(), "-c", missing.to_str().unwrap(),
        ]).unwrap();
        assert!(run(&cli).is_err());
    }
}
