//! South Polar Stereographic projection.
//!
//! The forward transform follows Snyder eqs. 15-9, 14-15 and 21-34 with the
//! latitude negated inside the trig arguments for the south pole. There is no
//! closed-form inverse; the latitude is recovered from the conformal
//! latitude with the 8th-order series in the eccentricity (Snyder eq. 3-5).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::grid::GRID;

/// Eccentricity of the Hughes 1980 ellipsoid used by the grid.
pub const ECCENTRICITY: f64 = 0.081816153;

/// Semi-major axis of the projection ellipsoid (km).
pub const SEMI_MAJOR_AXIS_KM: f64 = 6378.273;

/// Latitude of true scale (degrees).
pub const TRUE_SCALE_LAT_DEG: f64 = -71.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    /// Latitude (negative = south).
    pub lat: f64,
    /// Longitude (negative = west).
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A projected coordinate in meters, pole at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolarXY {
    /// Easting (m).
    pub x: f64,
    /// Northing (m).
    pub y: f64,
}

impl PolarXY {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Isometric-latitude term `t` for a latitude in radians.
fn conformal_t(lat: f64) -> f64 {
    let e = ECCENTRICITY;
    let esin = e * (-lat).sin();
    (FRAC_PI_4 + lat / 2.0).tan() / ((1.0 - esin) / (1.0 + esin)).powf(e / 2.0)
}

/// `t_c` and `m_c` at the true-scale parallel.
fn true_scale_terms() -> (f64, f64) {
    let e = ECCENTRICITY;
    let lat_c = TRUE_SCALE_LAT_DEG.to_radians();
    let t_c = conformal_t(lat_c);
    let m_c = (-lat_c).cos() / (1.0 - e * e * (-lat_c).sin().powi(2)).sqrt();
    (t_c, m_c)
}

/// Project a geographic coordinate without checking the grid extent.
///
/// Latitudes far from the pole give coordinates well outside the grid; use
/// [`project`] when the result is going to index the raster.
pub fn forward(coord: LatLon) -> PolarXY {
    let lat = coord.lat.to_radians();
    let lon = coord.lon.to_radians();

    let (t_c, m_c) = true_scale_terms();
    let p = conformal_t(lat) * (SEMI_MAJOR_AXIS_KM * m_c / t_c);

    // km relative to the grid centre, 0°E pointing up
    let x = -p * (-lon).sin();
    let y = p * (-lon).cos();

    PolarXY::new(1e3 * x, 1e3 * y)
}

/// Project a geographic coordinate onto the grid.
///
/// Returns `None` when either component lands outside the grid extent.
/// The extent is inclusive: a coordinate exactly on the edge is kept.
pub fn project(coord: LatLon) -> Option<PolarXY> {
    let xy = forward(coord);
    GRID.contains(xy).then_some(xy)
}

/// [`project`] over a slice, one output per input.
pub fn project_batch(coords: &[LatLon]) -> Vec<Option<PolarXY>> {
    coords.iter().map(|&c| project(c)).collect()
}

/// [`forward`] over a slice.
pub fn forward_batch(coords: &[LatLon]) -> Vec<PolarXY> {
    coords.iter().map(|&c| forward(c)).collect()
}

/// Convert a projected coordinate back to latitude and longitude.
pub fn inverse(xy: PolarXY) -> LatLon {
    inverse_with_lon0(xy, 0.0)
}

/// Convert a projected coordinate back to latitude and longitude with a
/// central meridian of `lon0` degrees.
///
/// The returned longitude is wrapped into (-180°, 180°].
pub fn inverse_with_lon0(xy: PolarXY, lon0: f64) -> LatLon {
    let e = ECCENTRICITY;
    let x = -xy.x;
    let y = -xy.y;

    let (t_c, m_c) = true_scale_terms();
    let p = (x * x + y * y).sqrt();
    let t = p * t_c / (1e3 * SEMI_MAJOR_AXIS_KM * m_c);

    let chi = FRAC_PI_2 - 2.0 * t.atan();

    let e2 = e.powi(2);
    let e4 = e.powi(4);
    let e6 = e.powi(6);
    let e8 = e.powi(8);

    let lat = chi
        + (0.5 * e2 + (5.0 / 24.0) * e4 + (1.0 / 12.0) * e6 + (13.0 / 360.0) * e8)
            * (2.0 * chi).sin()
        + ((7.0 / 48.0) * e4 + (29.0 / 240.0) * e6 + (811.0 / 11520.0) * e8) * (4.0 * chi).sin()
        + ((7.0 / 120.0) * e6 + (81.0 / 1120.0) * e8) * (6.0 * chi).sin()
        + ((4279.0 / 161280.0) * e8) * (8.0 * chi).sin();

    let lon = lon0.to_radians() + x.atan2(-y);

    LatLon::new((-lat).to_degrees(), wrap_pi(-lon).to_degrees())
}

/// [`inverse`] over a slice.
pub fn inverse_batch(coords: &[PolarXY]) -> Vec<LatLon> {
    coords.iter().map(|&xy| inverse(xy)).collect()
}

/// Wrap an angle into (-π, π].
fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
