//! Bedmap2 command-line tool.
//!
//! Projects coordinates to and from the Antarctic Polar Stereographic grid,
//! samples Bedmap2 layers and writes surface/bed profiles as CSV.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use bedmap_data::{
    curved_profile, flat_profile, ArchiveDownloader, BedmapError, CoordMode, DataConfig,
    DataProvisioner, Dataset, Layer, LocalOnly, Sample, DEFAULT_STEP_M,
};
use bedmap_transform::{
    coord_to_index, forward, inverse_with_lon0, latlon_to_index, GridIndex, LatLon, PolarXY, GRID,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bedmap")]
#[command(about = "Bedmap2 Antarctic ice-sheet data access", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the bedmap2_*.tif files
    #[arg(long, global = true, env = "BEDMAP2_DATA")]
    data_dir: Option<PathBuf>,

    /// Never download; fail if the files are missing
    #[arg(long, global = true)]
    offline: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project latitude/longitude (degrees) to polar stereographic x/y (m)
    #[command(allow_negative_numbers = true)]
    Project { lat: f64, lon: f64 },

    /// Convert polar stereographic x/y (m) back to latitude/longitude
    #[command(allow_negative_numbers = true)]
    Unproject {
        x: f64,
        y: f64,

        /// Central meridian (degrees)
        #[arg(long, default_value = "0")]
        lon0: f64,
    },

    /// Grid cell (row, col) of a coordinate
    #[command(allow_negative_numbers = true)]
    Index {
        a: f64,
        b: f64,

        /// Coordinate mode: latlon or xy
        #[arg(long, default_value = "latlon", value_parser = parse_mode)]
        mode: CoordMode,
    },

    /// Sample a layer at one or more coordinate pairs
    #[command(allow_negative_numbers = true)]
    Sample {
        /// Layer name, e.g. bed, surface, thickness
        #[arg(value_parser = parse_layer)]
        layer: Layer,

        /// Coordinate pairs: a1 b1 [a2 b2 ...]
        #[arg(required = true, num_args = 2..)]
        coords: Vec<f64>,

        /// Coordinate mode: latlon or xy
        #[arg(long, default_value = "latlon", value_parser = parse_mode)]
        mode: CoordMode,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a surface/bed/thickness profile between two points as CSV
    #[command(allow_negative_numbers = true)]
    Profile {
        lat0: f64,
        lon0: f64,
        lat1: f64,
        lon1: f64,

        /// Distance between points (m)
        #[arg(long, default_value_t = DEFAULT_STEP_M)]
        step: f64,

        /// Follow the Earth's curvature
        #[arg(long)]
        curved: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download and unpack the GeoTIFF files if they are missing
    Fetch,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Data(#[from] BedmapError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("coordinates must come in pairs, got {0} values")]
    OddCoordinates(usize),
}

type Result<T> = std::result::Result<T, CliError>;

fn parse_layer(s: &str) -> std::result::Result<Layer, String> {
    s.parse().map_err(|e: BedmapError| e.to_string())
}

fn parse_mode(s: &str) -> std::result::Result<CoordMode, String> {
    s.parse().map_err(|e: BedmapError| e.to_string())
}

#[derive(Serialize)]
struct SampleRecord {
    a: f64,
    b: f64,
    value: Option<f32>,
    status: &'static str,
}

impl SampleRecord {
    fn new(a: f64, b: f64, sample: Sample) -> Self {
        let status = match sample {
            Sample::Value(_) => "value",
            Sample::NoData => "nodata",
            Sample::OutOfGrid => "out_of_grid",
        };
        Self {
            a,
            b,
            value: sample.value(),
            status,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<DataConfig> {
    let mut config = match &cli.config {
        Some(path) => DataConfig::from_yaml_file(path)?,
        None => DataConfig::default(),
    };
    // clap already folds BEDMAP2_DATA into --data-dir
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if cli.offline {
        config = config.offline();
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Split a flat list `a1 b1 a2 b2 ...` into the two coordinate arrays.
fn split_pairs(coords: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if coords.len() % 2 != 0 {
        return Err(CliError::OddCoordinates(coords.len()));
    }
    Ok(coords.chunks_exact(2).map(|p| (p[0], p[1])).unzip())
}

fn format_index(index: Option<GridIndex>) -> String {
    match index {
        Some(i) => format!("{} {}", i.row, i.col),
        None => "outside grid".to_string(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Project { lat, lon } => {
            let xy = forward(LatLon::new(*lat, *lon));
            if GRID.contains(xy) {
                writeln!(out, "{} {}", xy.x, xy.y)?;
            } else {
                writeln!(out, "{} {} (outside grid)", xy.x, xy.y)?;
            }
        }
        Commands::Unproject { x, y, lon0 } => {
            let ll = inverse_with_lon0(PolarXY::new(*x, *y), *lon0);
            writeln!(out, "{} {}", ll.lat, ll.lon)?;
        }
        Commands::Index { a, b, mode } => {
            let index = match mode {
                CoordMode::Geographic => latlon_to_index(LatLon::new(*a, *b)),
                CoordMode::Projected => coord_to_index(PolarXY::new(*a, *b)),
            };
            writeln!(out, "{}", format_index(index))?;
        }
        Commands::Sample {
            layer,
            coords,
            mode,
            json,
        } => {
            let (first, second) = split_pairs(coords)?;
            let dataset = Dataset::new(load_config(&cli)?)?;
            let samples = dataset.sample(&first, &second, *layer, *mode)?;

            if *json {
                let records: Vec<SampleRecord> = first
                    .iter()
                    .zip(&second)
                    .zip(&samples)
                    .map(|((&a, &b), &s)| SampleRecord::new(a, b, s))
                    .collect();
                serde_json::to_writer_pretty(&mut out, &records)?;
                writeln!(out)?;
            } else {
                for ((a, b), s) in first.iter().zip(&second).zip(&samples) {
                    writeln!(out, "{} {} {}", a, b, s)?;
                }
            }
        }
        Commands::Profile {
            lat0,
            lon0,
            lat1,
            lon1,
            step,
            curved,
            output,
        } => {
            let dataset = Dataset::new(load_config(&cli)?)?;
            let start = LatLon::new(*lat0, *lon0);
            let end = LatLon::new(*lat1, *lon1);

            let mut sink: Box<dyn Write + '_> = match output {
                Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
                None => Box::new(&mut out),
            };
            if *curved {
                let profile = curved_profile(&dataset, start, end, *step)?;
                info!(points = profile.len(), "curved profile built");
                profile.write_csv(&mut sink)?;
            } else {
                let profile = flat_profile(&dataset, start, end, *step)?;
                info!(points = profile.len(), "flat profile built");
                profile.write_csv(&mut sink)?;
            }
            sink.flush()?;
        }
        Commands::Fetch => {
            let config = load_config(&cli)?;
            if config.download {
                let downloader = ArchiveDownloader::new(config.archive_url.clone())?
                    .with_callback(Box::new(|msg: &str| eprintln!("{}", msg)));
                downloader.ensure_available(&config.data_dir)?;
                let stats = downloader.download_stats();
                info!(
                    archives = stats.archives_downloaded,
                    bytes = stats.bytes_downloaded,
                    "fetch complete"
                );
            } else {
                LocalOnly.ensure_available(&config.data_dir)?;
            }
            writeln!(out, "Bedmap2 data available in {}", config.data_dir.display())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
