//! Error types for the Bedmap2 data crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or sampling Bedmap2 layers.
///
/// Coordinates that fall off the grid and cells holding the no-data value
/// are not errors; they are reported per element as
/// [`Sample::OutOfGrid`](crate::Sample::OutOfGrid) and
/// [`Sample::NoData`](crate::Sample::NoData).
#[derive(Debug, Error)]
pub enum BedmapError {
    /// The requested layer name is not one of the ten Bedmap2 layers.
    #[error("{0} is not a valid Bedmap2 layer")]
    UnknownLayer(String),

    /// The coordinate mode is neither geographic nor projected.
    #[error("{0} is an invalid dataset access mode")]
    InvalidMode(String),

    /// The raster files could not be made available.
    #[error("Bedmap2 data unavailable in {dir}: {reason}")]
    DataUnavailable {
        /// Data directory that was checked.
        dir: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// The two coordinate arrays have different lengths.
    #[error("coordinate arrays differ in length ({first} vs {second})")]
    ShapeMismatch {
        /// Length of the first array (latitude or x).
        first: usize,
        /// Length of the second array (longitude or y).
        second: usize,
    },

    /// A profile endpoint projects outside the grid.
    #[error("profile endpoint ({lat}, {lon}) is outside the Bedmap2 grid")]
    EndpointOutsideGrid {
        /// Endpoint latitude.
        lat: f64,
        /// Endpoint longitude.
        lon: f64,
    },

    /// Profile step size is not a positive finite number.
    #[error("invalid profile step {0} m (must be positive)")]
    InvalidStep(f64),

    /// The raster's pixel buffer does not match its dimensions.
    #[error("Invalid raster {path}: {reason}")]
    InvalidRaster {
        /// File that was read.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Unsupported data type in the TIFF file.
    #[error("Unsupported TIFF data type: {0}")]
    UnsupportedDataType(String),

    /// Cache lock was poisoned (a thread panicked while holding the lock).
    #[error("Layer cache lock was poisoned")]
    CacheLockPoisoned,

    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// HTTP request error when fetching the archive.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The downloaded archive could not be unpacked.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The configuration file could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}
