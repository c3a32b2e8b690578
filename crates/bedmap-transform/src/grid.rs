//! The Bedmap2 1 km grid and the mapping from projected coordinates to
//! raster indices.

use crate::stereo::{forward, LatLon, PolarXY};

/// Geometry of a square polar grid centred on the pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridExtent {
    /// Number of rows (and columns).
    pub size: usize,
    /// Cell edge length (m).
    pub cell_m: f64,
    /// Minimum x and y coordinate (m).
    pub min_m: f64,
    /// Maximum x and y coordinate (m).
    pub max_m: f64,
}

/// The Bedmap2 1 km grid: 6667 x 6667 cells spanning ±3333.5 km.
pub const GRID: GridExtent = GridExtent {
    size: 6667,
    cell_m: 1000.0,
    min_m: -3_333_500.0,
    max_m: 3_333_500.0,
};

impl GridExtent {
    /// Largest valid row or column index.
    pub fn max_index(&self) -> usize {
        self.size - 1
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Whether a projected coordinate lies on the grid, edges included.
    pub fn contains(&self, xy: PolarXY) -> bool {
        self.contains_value(xy.x) && self.contains_value(xy.y)
    }

    fn contains_value(&self, v: f64) -> bool {
        // NaN fails both comparisons
        v >= self.min_m && v <= self.max_m
    }

    /// The same extent divided into `size` cells per side.
    ///
    /// Coarser Bedmap2 products cover the 1 km grid's extent with fewer,
    /// larger cells.
    pub fn with_size(&self, size: usize) -> GridExtent {
        GridExtent {
            size,
            cell_m: (self.max_m - self.min_m) / size as f64,
            ..*self
        }
    }

    /// Row holding projected `x`, or `None` off the extent.
    pub fn row_of(&self, x: f64) -> Option<usize> {
        if !self.contains_value(x) {
            return None;
        }
        quantize((x - self.min_m).abs() / self.cell_m - 0.5, self.size)
    }

    /// Column holding projected `y`, or `None` off the extent.
    ///
    /// Columns count down from the maximum y.
    pub fn col_of(&self, y: f64) -> Option<usize> {
        if !self.contains_value(y) {
            return None;
        }
        quantize((y + self.min_m).abs() / self.cell_m - 0.5, self.size)
    }

    /// Cell holding a projected coordinate, or `None` off the extent.
    pub fn index_of(&self, xy: PolarXY) -> Option<GridIndex> {
        Some(GridIndex::new(self.row_of(xy.x)?, self.col_of(xy.y)?))
    }
}

/// A `(row, col)` address of one grid cell.
///
/// Rows follow x (increasing eastward) and columns follow y (decreasing
/// northward), matching the orientation the rasters are read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset into a row-major buffer with `cols` columns.
    pub fn linear(&self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

/// Quantize a cell offset (cells from the low edge, minus half a cell) into
/// an index below `size`. Truncation toward zero keeps the half-cell sliver
/// at the low edge in cell 0.
fn quantize(offset_cells: f64, size: usize) -> Option<usize> {
    let index = offset_cells.trunc();
    if index < 0.0 || index >= size as f64 {
        return None;
    }
    Some(index as usize)
}

/// Map a projected coordinate (m) to its grid cell.
///
/// Returns `None` for coordinates outside the grid extent; they are never
/// clamped onto the edge cells.
pub fn coord_to_index(xy: PolarXY) -> Option<GridIndex> {
    GRID.index_of(xy)
}

/// [`coord_to_index`] over a slice, one output per input.
pub fn coord_to_index_batch(coords: &[PolarXY]) -> Vec<Option<GridIndex>> {
    coords.iter().map(|&xy| coord_to_index(xy)).collect()
}

/// Map a geographic coordinate to its grid cell.
pub fn latlon_to_index(coord: LatLon) -> Option<GridIndex> {
    coord_to_index(forward(coord))
}

/// [`latlon_to_index`] over a slice, one output per input.
pub fn latlon_to_index_batch(coords: &[LatLon]) -> Vec<Option<GridIndex>> {
    coords.iter().map(|&c| latlon_to_index(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_centre_cell() {
        assert_eq!(
            coord_to_index(PolarXY::new(0.0, 0.0)),
            Some(GridIndex::new(3333, 3333))
        );
    }

    #[test]
    fn test_edges_are_inclusive() {
        let max = GRID.max_m;
        let min = GRID.min_m;

        assert_eq!(coord_to_index(PolarXY::new(min, max)), Some(GridIndex::new(0, 0)));
        assert_eq!(coord_to_index(PolarXY::new(max, min)), Some(GridIndex::new(6666, 6666)));
        assert_eq!(coord_to_index(PolarXY::new(min, min)), Some(GridIndex::new(0, 6666)));
        assert_eq!(coord_to_index(PolarXY::new(max, max)), Some(GridIndex::new(6666, 0)));
    }

    #[test]
    fn test_outside_extent_is_none() {
        let max = GRID.max_m;
        let min = GRID.min_m;

        assert!(coord_to_index(PolarXY::new(max + 1.0, 0.0)).is_none());
        assert!(coord_to_index(PolarXY::new(min - 1.0, 0.0)).is_none());
        assert!(coord_to_index(PolarXY::new(0.0, max + 1.0)).is_none());
        assert!(coord_to_index(PolarXY::new(0.0, min - 1.0)).is_none());
        assert!(coord_to_index(PolarXY::new(f64::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_cells_are_one_km() {
        // Cell 3333 spans [0, 1000) m in x
        assert_eq!(coord_to_index(PolarXY::new(999.0, 0.0)).map(|i| i.row), Some(3333));
        assert_eq!(coord_to_index(PolarXY::new(1000.0, 0.0)).map(|i| i.row), Some(3334));
        assert_eq!(coord_to_index(PolarXY::new(-1.0, 0.0)).map(|i| i.row), Some(3332));

        // Columns run the other way
        assert_eq!(coord_to_index(PolarXY::new(0.0, 1000.0)).map(|i| i.col), Some(3332));
        assert_eq!(coord_to_index(PolarXY::new(0.0, -1000.0)).map(|i| i.col), Some(3334));
    }

    #[test]
    fn test_linear_offset() {
        assert_eq!(GridIndex::new(2, 3).linear(10), 23);
        assert_eq!(GridIndex::new(3333, 3333).linear(GRID.size), 3333 * 6667 + 3333);
    }

    #[test]
    fn test_latlon_to_index_pole() {
        assert_eq!(
            latlon_to_index(LatLon::new(-90.0, 0.0)),
            Some(GridIndex::new(3333, 3333))
        );
        assert_eq!(latlon_to_index(LatLon::new(-10.0, 0.0)), None);
    }

    #[test]
    fn test_grid_constants() {
        assert_eq!(GRID.max_index(), 6666);
        assert_eq!(GRID.cell_count(), 6667 * 6667);
        assert_eq!(GRID.max_m - GRID.min_m, GRID.size as f64 * GRID.cell_m);
    }

    #[test]
    fn test_with_size_keeps_extent() {
        assert_eq!(GRID.with_size(GRID.size), GRID);

        let coarse = GRID.with_size(1361);
        assert_eq!(coarse.min_m, GRID.min_m);
        assert_eq!(coarse.max_m, GRID.max_m);
        assert!((coarse.cell_m - 4898.604).abs() < 1e-3);
    }

    #[test]
    fn test_coarse_index_uses_its_own_cells() {
        let coarse = GRID.with_size(1361);
        let xy = PolarXY::new(GRID.min_m + 100_000.0, GRID.max_m - 100_000.0);

        // 100 km in is cell 99 on the 1 km grid but cell 19 on ~4.9 km cells
        assert_eq!(coord_to_index(xy), Some(GridIndex::new(99, 99)));
        assert_eq!(coarse.index_of(xy), Some(GridIndex::new(19, 19)));

        assert_eq!(
            coarse.index_of(PolarXY::new(GRID.max_m, GRID.min_m)),
            Some(GridIndex::new(1360, 1360))
        );
        assert!(coarse.index_of(PolarXY::new(GRID.max_m + 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_batch_forms_keep_positions() {
        let coords = [
            PolarXY::new(0.0, 0.0),
            PolarXY::new(GRID.max_m + 1.0, 0.0),
            PolarXY::new(GRID.min_m, GRID.max_m),
        ];
        assert_eq!(
            coord_to_index_batch(&coords),
            vec![Some(GridIndex::new(3333, 3333)), None, Some(GridIndex::new(0, 0))]
        );

        let points = [
            LatLon::new(-10.0, 0.0),
            LatLon::new(-90.0, 0.0),
            LatLon::new(45.0, 90.0),
        ];
        assert_eq!(
            latlon_to_index_batch(&points),
            vec![None, Some(GridIndex::new(3333, 3333)), None]
        );
        assert!(coord_to_index_batch(&[]).is_empty());
    }
}
