//! # bedmap-transform
//!
//! Coordinate transforms for the Bedmap2 Antarctic grid.
//!
//! Bedmap2 stores bed elevation, surface elevation, ice thickness and a
//! handful of masks on a single 6667 x 6667 raster with 1 km cells, laid
//! out in a South Polar Stereographic projection with true scale at 71°S.
//! This crate provides the math needed to address that raster:
//!
//! - [`forward`] / [`project`] (lat/lon to x/y) and [`inverse`] (x/y to lat/lon):
//!   polar stereographic transforms after Snyder, *Map Projections - A
//!   Working Manual* (USGS PP 1395), pp. 154-163.
//! - [`GRID`] / [`coord_to_index`]: the grid extent and the quantization of projected
//!   coordinates into `(row, col)` indices.
//! - [`radius`]: geocentric radius of the WGS84 ellipsoid.
//!
//! Coordinates that fall outside the grid are never errors. They come back
//! as `None` so that batch callers keep a 1:1 correspondence between inputs
//! and outputs.
//!
//! ## Example
//!
//! ```
//! use bedmap_transform::{latlon_to_index, project, GridIndex, LatLon};
//!
//! // The pole sits at the centre of the grid.
//! let pole = project(LatLon::new(-90.0, 0.0)).expect("pole is inside the grid");
//! assert!(pole.x.abs() < 1e-6 && pole.y.abs() < 1e-6);
//! assert_eq!(latlon_to_index(LatLon::new(-90.0, 0.0)), Some(GridIndex::new(3333, 3333)));
//!
//! // 10°S is far outside the grid.
//! assert!(project(LatLon::new(-10.0, 0.0)).is_none());
//! ```

mod geoid;
mod grid;
mod stereo;

pub use geoid::{radius, radius_batch, WGS84_EQUATORIAL_RADIUS_M, WGS84_FLATTENING};
pub use grid::{
    coord_to_index, coord_to_index_batch, latlon_to_index, latlon_to_index_batch, GridExtent,
    GridIndex, GRID,
};
pub use stereo::{
    forward, forward_batch, inverse, inverse_batch, inverse_with_lon0, project, project_batch,
    LatLon, PolarXY, ECCENTRICITY, SEMI_MAJOR_AXIS_KM, TRUE_SCALE_LAT_DEG,
};
