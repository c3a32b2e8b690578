//! Making sure the Bedmap2 GeoTIFF files are on disk.
//!
//! The files are distributed as a single zip archive
//! (`bedmap2_tiff.zip`) that unpacks into a `bedmap2_tiff/` directory.
//! The presence of `bedmap2_bed.tif` marks a complete extraction.

use crate::{BedmapError, Layer, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Name of the archive file kept next to the data directory.
const ARCHIVE_FILE_NAME: &str = "bedmap2_tiff.zip";

/// HTTP timeout for the archive download (it is several hundred MB).
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Callback for download progress messages.
pub type DownloadCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Ensures raster files exist before the first layer is read.
pub trait DataProvisioner: Send + Sync {
    fn ensure_available(&self, data_dir: &Path) -> Result<()>;
}

/// Path of the file whose presence means the data is installed.
pub fn marker_path(data_dir: &Path) -> PathBuf {
    data_dir.join(Layer::Bed.file_name())
}

/// Whether the data directory holds an extracted Bedmap2 distribution.
pub fn data_exists(data_dir: &Path) -> bool {
    marker_path(data_dir).exists()
}

/// Provisioner that never downloads: the files must already be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl DataProvisioner for LocalOnly {
    fn ensure_available(&self, data_dir: &Path) -> Result<()> {
        if data_exists(data_dir) {
            Ok(())
        } else {
            Err(BedmapError::DataUnavailable {
                dir: data_dir.to_path_buf(),
                reason: format!(
                    "{} not found and downloading is disabled",
                    marker_path(data_dir).display()
                ),
            })
        }
    }
}

/// Download statistics for the provisioner.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadStats {
    /// Number of archives downloaded this session.
    pub archives_downloaded: usize,
    /// Total bytes downloaded this session.
    pub bytes_downloaded: u64,
}

/// Provisioner that fetches and unpacks the published archive.
///
/// The archive is stored in, and extracted into, the parent of the data
/// directory, so the default `data/bedmap2_tiff` layout is produced by
/// extracting into `data/`. An archive already present there is reused.
pub struct ArchiveDownloader {
    /// URL of the zip archive.
    url: String,
    /// HTTP client for the download.
    client: reqwest::blocking::Client,
    /// Optional progress callback.
    callback: Option<DownloadCallback>,
    /// Number of archives downloaded this session.
    archives_downloaded: AtomicUsize,
    /// Total bytes downloaded this session.
    bytes_downloaded: AtomicU64,
}

impl std::fmt::Debug for ArchiveDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveDownloader")
            .field("url", &self.url)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl ArchiveDownloader {
    /// Create a downloader for the archive at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
            callback: None,
            archives_downloaded: AtomicUsize::new(0),
            bytes_downloaded: AtomicU64::new(0),
        })
    }

    /// Report progress messages through `callback`.
    pub fn with_callback(mut self, callback: DownloadCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// The archive URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get download statistics for this session.
    pub fn download_stats(&self) -> DownloadStats {
        DownloadStats {
            archives_downloaded: self.archives_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
        }
    }

    fn notify(&self, msg: &str) {
        info!("{}", msg);
        if let Some(cb) = &self.callback {
            cb(msg);
        }
    }

    /// Download the archive to `archive_path`.
    fn download(&self, archive_path: &Path) -> Result<()> {
        if let Some(parent) = archive_path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.notify(&format!("Downloading {}", self.url));
        let response = self.client.get(&self.url).send()?;

        if !response.status().is_success() {
            return Err(BedmapError::DataUnavailable {
                dir: archive_path.to_path_buf(),
                reason: format!("HTTP {} fetching {}", response.status(), self.url),
            });
        }

        let bytes = response.bytes()?;

        self.archives_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);
        metrics::counter!("bedmap_archive_bytes_downloaded_total").increment(bytes.len() as u64);

        // Write under a temporary name so an interrupted download is not
        // mistaken for a complete archive next time
        let partial = archive_path.with_extension("zip.part");
        let mut file = fs::File::create(&partial)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&partial, archive_path)?;

        self.notify(&format!(
            "Downloaded {} bytes to {}",
            bytes.len(),
            archive_path.display()
        ));
        Ok(())
    }

    /// Unpack the archive into `dest`.
    fn extract(&self, archive_path: &Path, dest: &Path) -> Result<()> {
        self.notify(&format!(
            "Extracting {} into {}",
            archive_path.display(),
            dest.display()
        ));
        let file = fs::File::open(archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(dest)?;
        Ok(())
    }

    fn provision(&self, data_dir: &Path) -> Result<()> {
        let root = data_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let archive_path = root.join(ARCHIVE_FILE_NAME);

        if archive_path.exists() {
            self.notify("Bedmap2 archive already downloaded");
        } else {
            self.download(&archive_path)?;
        }

        self.extract(&archive_path, root)?;

        if data_exists(data_dir) {
            Ok(())
        } else {
            Err(BedmapError::DataUnavailable {
                dir: data_dir.to_path_buf(),
                reason: format!(
                    "{} did not contain {}",
                    archive_path.display(),
                    marker_path(data_dir).display()
                ),
            })
        }
    }
}

impl DataProvisioner for ArchiveDownloader {
    fn ensure_available(&self, data_dir: &Path) -> Result<()> {
        if data_exists(data_dir) {
            return Ok(());
        }

        self.provision(data_dir).map_err(|e| match e {
            e @ BedmapError::DataUnavailable { .. } => e,
            other => BedmapError::DataUnavailable {
                dir: data_dir.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;

    fn write_archive(path: &Path, files: &[&str]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for name in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(b"not really a tiff").unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_local_only_requires_marker() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalOnly.ensure_available(dir.path()).unwrap_err();
        assert!(matches!(err, BedmapError::DataUnavailable { .. }));

        fs::write(marker_path(dir.path()), b"").unwrap();
        assert!(LocalOnly.ensure_available(dir.path()).is_ok());
    }

    #[test]
    fn test_existing_data_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(marker_path(dir.path()), b"").unwrap();

        // Unroutable URL: any network access would fail
        let downloader = ArchiveDownloader::new("http://127.0.0.1:9/bedmap2_tiff.zip").unwrap();
        assert!(downloader.ensure_available(dir.path()).is_ok());
        assert_eq!(downloader.download_stats().archives_downloaded, 0);
    }

    #[test]
    fn test_existing_archive_is_extracted() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("bedmap2_tiff");
        write_archive(
            &root.path().join(ARCHIVE_FILE_NAME),
            &["bedmap2_tiff/bedmap2_bed.tif", "bedmap2_tiff/bedmap2_surface.tif"],
        );

        let downloader = ArchiveDownloader::new("http://127.0.0.1:9/bedmap2_tiff.zip").unwrap();
        downloader.ensure_available(&data_dir).unwrap();

        assert!(data_exists(&data_dir));
        assert!(data_dir.join("bedmap2_surface.tif").exists());
        assert_eq!(downloader.download_stats().bytes_downloaded, 0);
    }

    #[test]
    fn test_archive_without_marker_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("bedmap2_tiff");
        write_archive(&root.path().join(ARCHIVE_FILE_NAME), &["readme.txt"]);

        let downloader = ArchiveDownloader::new("http://127.0.0.1:9/bedmap2_tiff.zip").unwrap();
        let err = downloader.ensure_available(&data_dir).unwrap_err();
        assert!(matches!(err, BedmapError::DataUnavailable { .. }));
    }

    #[test]
    fn test_failed_download_is_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let data_dir = root.path().join("bedmap2_tiff");

        let downloader = ArchiveDownloader::new("http://127.0.0.1:9/bedmap2_tiff.zip").unwrap();
        let err = downloader.ensure_available(&data_dir).unwrap_err();
        assert!(matches!(err, BedmapError::DataUnavailable { .. }));
        assert!(!root.path().join(ARCHIVE_FILE_NAME).exists());
    }
}
