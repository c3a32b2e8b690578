//! Raster loading and the in-memory layer representation.

use crate::{BedmapError, Result, Sample};
use bedmap_transform::{GridIndex, PolarXY, GRID};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

/// GDAL_NODATA TIFF tag, stored as an ASCII string.
const GDAL_NODATA_TAG: u16 = 42113;

/// A decoded single-band raster as handed over by a [`RasterReader`].
#[derive(Debug, Clone)]
pub struct RasterData {
    /// Pixel values in row-major order.
    pub values: Vec<f32>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Value marking cells without a measurement, if the file declares one.
    pub nodata: Option<f32>,
}

/// Reads a single-band raster file into memory.
///
/// The dataset only needs the pixel buffer and the no-data value, so any
/// format can stand in for GeoTIFF (tests use an in-memory reader).
pub trait RasterReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<RasterData>;
}

/// [`RasterReader`] for GeoTIFF files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffReader;

impl TiffReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode pixel data from the TIFF decoder, widening to `f32`.
    fn decode_values<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f32>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F32(data) => Ok(data),
            DecodingResult::F64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
        }
    }

    /// Read the no-data value from the GDAL_NODATA tag, if present.
    fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
        let text = decoder
            .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))
            .ok()?;
        parse_nodata(&text)
    }
}

/// Parse a GDAL_NODATA string such as `"-9999"` or `"nan"`.
fn parse_nodata(text: &str) -> Option<f32> {
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if text.eq_ignore_ascii_case("nan") {
        return Some(f32::NAN);
    }
    text.parse().ok()
}

impl RasterReader for TiffReader {
    fn read(&self, path: &Path) -> Result<RasterData> {
        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(file)?;

        // A full Bedmap2 layer is 6667 x 6667 f32 pixels = ~178 MB
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let nodata = Self::read_nodata(&mut decoder);
        let values = Self::decode_values(&mut decoder)?;

        let (rows, cols) = (height as usize, width as usize);
        if values.len() != rows * cols {
            // Multi-band or chunky files decode to a longer buffer
            return Err(BedmapError::UnsupportedDataType(format!(
                "{}: expected {} samples for {}x{}, decoded {}",
                path.display(),
                rows * cols,
                cols,
                rows,
                values.len()
            )));
        }

        Ok(RasterData {
            values,
            rows,
            cols,
            nodata,
        })
    }
}

/// A loaded layer: pixel values plus a per-cell validity flag.
#[derive(Debug)]
pub struct RasterLayer {
    values: Vec<f32>,
    valid: Vec<bool>,
    rows: usize,
    cols: usize,
    nodata: Option<f32>,
}

impl RasterLayer {
    /// Build a layer from decoded data, flagging every no-data cell.
    pub fn from_data(data: RasterData, path: &Path) -> Result<Self> {
        let RasterData {
            values,
            rows,
            cols,
            nodata,
        } = data;

        if values.len() != rows * cols {
            return Err(BedmapError::InvalidRaster {
                path: path.to_path_buf(),
                reason: format!(
                    "{} values for a {}x{} raster",
                    values.len(),
                    rows,
                    cols
                ),
            });
        }

        let valid = match nodata {
            Some(nd) if nd.is_nan() => values.iter().map(|v| !v.is_nan()).collect(),
            Some(nd) => values.iter().map(|&v| v != nd).collect(),
            None => vec![true; values.len()],
        };

        Ok(Self {
            values,
            valid,
            rows,
            cols,
            nodata,
        })
    }

    /// Sample the cell at `index`.
    ///
    /// Indices beyond this raster's dimensions are [`Sample::OutOfGrid`].
    pub fn get(&self, index: GridIndex) -> Sample {
        if index.row >= self.rows || index.col >= self.cols {
            return Sample::OutOfGrid;
        }
        let i = index.linear(self.cols);
        if self.valid[i] {
            Sample::Value(self.values[i])
        } else {
            Sample::NoData
        }
    }

    /// Sample the cell holding a projected coordinate.
    ///
    /// The raster is taken to span the full grid extent, so a layer stored
    /// at a coarser resolution is addressed with its own, larger cells.
    pub fn sample_at(&self, xy: PolarXY) -> Sample {
        let row = GRID.with_size(self.rows).row_of(xy.x);
        let col = GRID.with_size(self.cols).col_of(xy.y);
        match (row, col) {
            (Some(row), Some(col)) => self.get(GridIndex::new(row, col)),
            _ => Sample::OutOfGrid,
        }
    }

    /// Whether the raster has the 1 km grid's dimensions.
    pub fn is_full_resolution(&self) -> bool {
        self.rows == GRID.size && self.cols == GRID.size
    }

    /// Dimensions as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The no-data value declared by the source file.
    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    /// Number of cells flagged as no-data.
    pub fn nodata_count(&self) -> usize {
        self.valid.iter().filter(|v| !**v).count()
    }
}
