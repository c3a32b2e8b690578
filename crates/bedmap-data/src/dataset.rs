//! Cached, coordinate-indexed access to the Bedmap2 layers.

use crate::provision::{ArchiveDownloader, DataProvisioner, LocalOnly};
use crate::raster::{RasterLayer, RasterReader, TiffReader};
use crate::{BedmapError, CoordMode, DataConfig, Layer, Result, Sample};
use bedmap_transform::{forward, LatLon, PolarXY};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Loaded layers plus whether provisioning has succeeded.
#[derive(Debug, Default)]
struct LayerCache {
    layers: HashMap<Layer, Arc<RasterLayer>>,
    provisioned: bool,
}

/// Access to the Bedmap2 layers with lazy loading.
///
/// Each layer is read from disk the first time it is needed and kept for the
/// lifetime of the `Dataset`. A single lock covers the check-and-load, so
/// concurrent first requests for the same layer read the file once.
///
/// This type is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use bedmap_data::{CoordMode, DataConfig, Dataset, Layer};
///
/// let dataset = Dataset::new(DataConfig::default().with_env_overrides())?;
///
/// // Bed elevation at the South Pole and at Dome C
/// let bed = dataset.sample(&[-90.0, -75.1], &[0.0, 123.35], Layer::Bed, CoordMode::Geographic)?;
/// println!("{:?}", bed);
/// # Ok::<(), bedmap_data::BedmapError>(())
/// ```
pub struct Dataset {
    config: DataConfig,
    reader: Arc<dyn RasterReader>,
    provisioner: Box<dyn DataProvisioner>,
    cache: Mutex<LayerCache>,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("config", &self.config)
            .field("loaded_layers", &self.loaded_layer_count())
            .finish()
    }
}

impl Dataset {
    /// Create a dataset reading GeoTIFF files as described by `config`.
    ///
    /// Missing files are downloaded when `config.download` is set.
    pub fn new(config: DataConfig) -> Result<Self> {
        let provisioner: Box<dyn DataProvisioner> = if config.download {
            Box::new(ArchiveDownloader::new(config.archive_url.clone())?)
        } else {
            Box::new(LocalOnly)
        };
        Ok(Self::with_parts(config, Arc::new(TiffReader::new()), provisioner))
    }

    /// Create a dataset with an explicit reader and provisioner.
    pub fn with_parts(
        config: DataConfig,
        reader: Arc<dyn RasterReader>,
        provisioner: Box<dyn DataProvisioner>,
    ) -> Self {
        Self {
            config,
            reader,
            provisioner,
            cache: Mutex::new(LayerCache::default()),
        }
    }

    /// The configuration this dataset was built with.
    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Make sure the raster files are present, without loading any layer.
    pub fn ensure_available(&self) -> Result<()> {
        let mut cache = self.cache.lock().map_err(|_| BedmapError::CacheLockPoisoned)?;
        self.provision(&mut cache)
    }

    fn provision(&self, cache: &mut LayerCache) -> Result<()> {
        if !cache.provisioned {
            self.provisioner.ensure_available(&self.config.data_dir)?;
            cache.provisioned = true;
        }
        Ok(())
    }

    /// Resolve a layer by name, loading it on first use.
    pub fn resolve_layer(&self, name: &str) -> Result<Arc<RasterLayer>> {
        self.layer(name.parse()?)
    }

    /// Get a layer, loading it on first use.
    pub fn layer(&self, layer: Layer) -> Result<Arc<RasterLayer>> {
        let mut cache = self.cache.lock().map_err(|_| BedmapError::CacheLockPoisoned)?;

        if let Some(loaded) = cache.layers.get(&layer) {
            debug!(layer = layer.name(), "layer cache hit");
            return Ok(Arc::clone(loaded));
        }

        self.provision(&mut cache)?;

        let path = self.config.path_of(&layer.file_name());
        info!(layer = layer.name(), path = %path.display(), "loading layer");
        let data = self.reader.read(&path)?;
        let loaded = Arc::new(RasterLayer::from_data(data, &path)?);
        metrics::counter!("bedmap_layer_loads_total", "layer" => layer.name()).increment(1);

        if !loaded.is_full_resolution() {
            let (rows, cols) = loaded.dimensions();
            info!(
                layer = layer.name(),
                rows, cols, "coarse layer; sampling with its own cell size"
            );
        }

        cache.layers.insert(layer, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Sample a layer at a set of coordinates.
    ///
    /// In [`CoordMode::Geographic`] the arrays are latitudes and longitudes
    /// in degrees; in [`CoordMode::Projected`] they are polar stereographic
    /// x and y in meters. The result has one [`Sample`] per input pair.
    pub fn sample(
        &self,
        first: &[f64],
        second: &[f64],
        layer: Layer,
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        if first.len() != second.len() {
            return Err(BedmapError::ShapeMismatch {
                first: first.len(),
                second: second.len(),
            });
        }

        let raster = self.layer(layer)?;

        let samples: Vec<Sample> = first
            .iter()
            .zip(second)
            .map(|(&a, &b)| raster.sample_at(to_xy(a, b, mode)))
            .collect();

        debug!(
            layer = layer.name(),
            mode = mode.name(),
            points = samples.len(),
            missing = samples.iter().filter(|s| s.is_missing()).count(),
            "sampled layer"
        );
        Ok(samples)
    }

    /// [`sample`](Self::sample) with the layer and mode given by name.
    ///
    /// Modes are `latlon` (or `geographic`) and `xy` (or `projected`).
    pub fn sample_named(
        &self,
        first: &[f64],
        second: &[f64],
        name: &str,
        mode: &str,
    ) -> Result<Vec<Sample>> {
        let layer: Layer = name.parse()?;
        let mode: CoordMode = mode.parse()?;
        self.sample(first, second, layer, mode)
    }

    /// Sample a layer at a single coordinate.
    pub fn sample_point(&self, a: f64, b: f64, layer: Layer, mode: CoordMode) -> Result<Sample> {
        let raster = self.layer(layer)?;
        Ok(raster.sample_at(to_xy(a, b, mode)))
    }

    /// Check if a layer is currently loaded in memory.
    pub fn is_loaded(&self, layer: Layer) -> bool {
        self.cache
            .lock()
            .map(|c| c.layers.contains_key(&layer))
            .unwrap_or(false)
    }

    /// Get the number of layers currently loaded in memory.
    pub fn loaded_layer_count(&self) -> usize {
        self.cache.lock().map(|c| c.layers.len()).unwrap_or(0)
    }
}

fn to_xy(a: f64, b: f64, mode: CoordMode) -> PolarXY {
    match mode {
        CoordMode::Geographic => forward(LatLon::new(a, b)),
        CoordMode::Projected => PolarXY::new(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterData;
    use bedmap_transform::GRID;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reader producing a small raster whose value encodes the cell position.
    struct FakeReader {
        reads: AtomicUsize,
        size: usize,
    }

    impl RasterReader for FakeReader {
        fn read(&self, _path: &Path) -> Result<RasterData> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let values = (0..self.size * self.size).map(|i| i as f32).collect();
            Ok(RasterData {
                values,
                rows: self.size,
                cols: self.size,
                nodata: Some(0.0),
            })
        }
    }

    struct Always;

    impl DataProvisioner for Always {
        fn ensure_available(&self, _data_dir: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn dataset(size: usize) -> (Dataset, Arc<FakeReader>) {
        let reader = Arc::new(FakeReader {
            reads: AtomicUsize::new(0),
            size,
        });
        let dataset = Dataset::with_parts(
            DataConfig::with_data_dir("unused"),
            reader.clone(),
            Box::new(Always),
        );
        (dataset, reader)
    }

    #[test]
    fn test_shape_mismatch() {
        let (dataset, reader) = dataset(4);
        let err = dataset
            .sample(&[1.0, 2.0], &[1.0], Layer::Bed, CoordMode::Projected)
            .unwrap_err();
        assert!(matches!(err, BedmapError::ShapeMismatch { first: 2, second: 1 }));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_coarse_raster_uses_its_own_cells() {
        // A 4x4 raster spans the whole extent with ~1667 km cells, so the
        // grid origin lands in cell (1, 1) rather than (3333, 3333)
        let (dataset, _) = dataset(4);
        let out = dataset
            .sample(
                &[0.0, GRID.max_m + 1.0],
                &[0.0, 0.0],
                Layer::Thickness,
                CoordMode::Projected,
            )
            .unwrap();
        assert_eq!(out, vec![Sample::Value(5.0), Sample::OutOfGrid]);
    }

    #[test]
    fn test_corner_cell_and_nodata() {
        let (dataset, _) = dataset(4);
        // Low x, high y -> (0, 0), which holds the no-data value 0.
        // Cell 0 reaches 1.5 cells in from the edge, so step past that for row 1.
        let xy_min = GRID.min_m + 10.0;
        let xy_max = GRID.max_m - 10.0;
        let out = dataset
            .sample(
                &[xy_min, xy_min + 2_600_000.0],
                &[xy_max, xy_max],
                Layer::Bed,
                CoordMode::Projected,
            )
            .unwrap();
        assert_eq!(out, vec![Sample::NoData, Sample::Value(4.0)]);
    }

    #[test]
    fn test_repeated_sample_reads_once() {
        let (dataset, reader) = dataset(4);
        let first = dataset
            .sample(&[-85.0], &[30.0], Layer::Surface, CoordMode::Geographic)
            .unwrap();
        let second = dataset
            .sample(&[-85.0], &[30.0], Layer::Surface, CoordMode::Geographic)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
        assert!(dataset.is_loaded(Layer::Surface));
    }

    #[test]
    fn test_sample_point() {
        let (dataset, _) = dataset(4);
        assert_eq!(
            dataset
                .sample_point(-90.0, 0.0, Layer::Bed, CoordMode::Geographic)
                .unwrap(),
            Sample::Value(5.0)
        );
        assert_eq!(
            dataset
                .sample_point(-10.0, 0.0, Layer::Bed, CoordMode::Geographic)
                .unwrap(),
            Sample::OutOfGrid
        );
        assert_eq!(
            dataset
                .sample_point(GRID.min_m - 1.0, 0.0, Layer::Bed, CoordMode::Projected)
                .unwrap(),
            Sample::OutOfGrid
        );
    }

    #[test]
    fn test_layers_cached_independently() {
        let (dataset, reader) = dataset(2);
        dataset.layer(Layer::Bed).unwrap();
        dataset.layer(Layer::Bed).unwrap();
        dataset.layer(Layer::Surface).unwrap();
        assert_eq!(reader.reads.load(Ordering::SeqCst), 2);
        assert_eq!(dataset.loaded_layer_count(), 2);
        assert!(dataset.is_loaded(Layer::Surface));
        assert!(!dataset.is_loaded(Layer::Thickness));
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let (dataset, reader) = dataset(8);
        let dataset = Arc::new(dataset);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dataset = Arc::clone(&dataset);
                std::thread::spawn(move || dataset.layer(Layer::Coverage).is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_named_entry_point_validates() {
        let (dataset, reader) = dataset(2);
        assert!(matches!(
            dataset.sample_named(&[0.0], &[0.0], "bedrock", "xy"),
            Err(BedmapError::UnknownLayer(_))
        ));
        assert!(matches!(
            dataset.sample_named(&[0.0], &[0.0], "bed", "polar"),
            Err(BedmapError::InvalidMode(_))
        ));
        assert!(matches!(
            dataset.resolve_layer("surfaces"),
            Err(BedmapError::UnknownLayer(_))
        ));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }
}
