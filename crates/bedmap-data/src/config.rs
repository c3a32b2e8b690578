//! Data directory configuration.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "BEDMAP2_DATA";

/// Default location of the extracted GeoTIFF files, relative to the
/// working directory.
pub const DEFAULT_DATA_DIR: &str = "data/bedmap2_tiff";

/// Where the Bedmap2 GeoTIFF archive is published.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://secure.antarctica.ac.uk/data/bedmap2/bedmap2_tiff.zip";

/// Configuration for a [`Dataset`](crate::Dataset).
///
/// ```yaml
/// data_dir: /srv/bedmap2/bedmap2_tiff
/// archive_url: https://secure.antarctica.ac.uk/data/bedmap2/bedmap2_tiff.zip
/// download: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the `bedmap2_*.tif` files.
    pub data_dir: PathBuf,
    /// URL of the zipped GeoTIFF distribution.
    pub archive_url: String,
    /// Fetch the archive when the files are missing.
    pub download: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            download: true,
        }
    }
}

impl DataConfig {
    /// Configuration reading from `data_dir`, with other fields defaulted.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse a YAML configuration document. Missing fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Apply the `BEDMAP2_DATA` environment variable, if set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    /// Disable downloading; missing files become an error.
    pub fn offline(mut self) -> Self {
        self.download = false;
        self
    }

    /// Full path of a file inside the data directory.
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}
