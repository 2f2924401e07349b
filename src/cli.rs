use std::path::PathBuf;

/// Link two CSV files by geographic relation of their WKT geometries
#[derive(clap::Parser, Debug)]
#[command(name = "wktlink", version, about, propagate_version = true)]
#[command(after_help = "Example:\n  wktlink -c assets.csv -k geo -p neighborhoods.csv -q the_geom -f OrgName")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// CSV file with WKT polygons and the fields to copy
    #[arg(short = 'p', long, value_hint = clap::ValueHint::FilePath)]
    pub polyfile: PathBuf,

    /// Column holding the polygon file's WKT geometry
    #[arg(short = 'q', long = "polyfile-wkt-field", default_value = "geometry")]
    pub polyfile_wkt_field: String,

    /// CSV file with WKT points (or other geometries) to receive the fields
    #[arg(short = 'c', long, value_hint = clap::ValueHint::FilePath)]
    pub coordinatesfile: PathBuf,

    /// Column holding the point file's WKT geometry
    #[arg(short = 'k', long = "pointfile-wkt-field", default_value = "geometry")]
    pub pointfile_wkt_field: String,

    /// Comma separated fields to match
    #[arg(short = 'f', long, value_delimiter = ',', default_value = "GEOID")]
    pub fields: Vec<String>,

    /// Copy the data from the points to the polygons instead
    #[arg(short, long)]
    pub reverse: bool,

    /// Do not record empty source values as contributions
    #[arg(long)]
    pub skip_null: bool,

    /// Input field delimiter
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output file, defaults to stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum OutputFormat { Csv, Geojson }
