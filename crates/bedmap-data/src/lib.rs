//! # bedmap-data
//!
//! Access to the Bedmap2 Antarctic ice-sheet grids by coordinate.
//!
//! Bedmap2 publishes ten single-band GeoTIFF layers (bed height, surface
//! height, ice thickness, masks and uncertainties) on a 6667 x 6667 grid of
//! 1 km cells in the Antarctic Polar Stereographic projection. This crate:
//! - Makes sure the files are on disk, downloading the archive if allowed
//! - Loads each layer once, on first use, and shares it between threads
//! - Samples layers at latitude/longitude or projected x/y positions
//! - Builds flat and curved surface/bed cross sections
//!
//! ## Data Layout
//!
//! Files are looked up as `<data_dir>/bedmap2_<layer>.tif`, with
//! `data_dir` defaulting to `data/bedmap2_tiff` and overridable through the
//! `BEDMAP2_DATA` environment variable or a YAML config file.
//!
//! ## Examples
//!
//! ```no_run
//! use bedmap_data::{CoordMode, DataConfig, Dataset, Sample};
//!
//! let dataset = Dataset::new(DataConfig::default().with_env_overrides())?;
//!
//! let thickness = dataset.thickness(&[-80.0, -10.0], &[45.0, 0.0], CoordMode::Geographic)?;
//! for sample in &thickness {
//!     match sample {
//!         Sample::Value(v) => println!("{} m of ice", v),
//!         Sample::NoData => println!("no ice"),
//!         Sample::OutOfGrid => println!("outside Antarctica"),
//!     }
//! }
//! # Ok::<(), bedmap_data::BedmapError>(())
//! ```
//!
//! ### Cross sections
//!
//! ```no_run
//! use bedmap_data::{flat_profile, DataConfig, Dataset, DEFAULT_STEP_M};
//! use bedmap_transform::LatLon;
//!
//! let dataset = Dataset::new(DataConfig::default())?;
//! let profile = flat_profile(
//!     &dataset,
//!     LatLon::new(-75.1, 123.35),
//!     LatLon::new(-90.0, 0.0),
//!     DEFAULT_STEP_M,
//! )?;
//! profile.write_csv(&mut std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod dataset;
mod error;
mod layer;
mod named;
mod profile;
mod provision;
mod raster;
mod sample;

pub use config::{DataConfig, DATA_DIR_ENV, DEFAULT_ARCHIVE_URL, DEFAULT_DATA_DIR};
pub use dataset::Dataset;
pub use error::BedmapError;
pub use layer::Layer;
pub use profile::{
    curved_profile, flat_profile, path_between, CurvedProfile, Profile, DEFAULT_STEP_M,
};
pub use provision::{
    data_exists, marker_path, ArchiveDownloader, DataProvisioner, DownloadCallback, DownloadStats,
    LocalOnly,
};
pub use raster::{RasterData, RasterLayer, RasterReader, TiffReader};
pub use sample::{CoordMode, Sample};

/// Result type for Bedmap2 data operations.
pub type Result<T> = std::result::Result<T, BedmapError>;
