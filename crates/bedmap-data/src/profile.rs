//! Ice-sheet cross sections between two geographic points.
//!
//! A profile is a straight line in the projected plane, sampled at a fixed
//! step. [`flat_profile`] reports heights against along-track range;
//! [`curved_profile`] additionally wraps them onto the WGS84 ellipsoid so the
//! Earth's curvature shows on long sections.

use crate::{BedmapError, CoordMode, Dataset, Result, Sample};
use bedmap_transform::{inverse, project, radius, LatLon, PolarXY, GRID};
use std::io::Write;

/// Default distance between profile points (m).
pub const DEFAULT_STEP_M: f64 = 500.0;

/// Most points a path may hold: twice the grid width at 1 m spacing.
const MAX_PATH_POINTS: f64 = 2.0 * (GRID.max_m - GRID.min_m);

/// Points from `start` toward `end` every `step_m` meters.
///
/// The start point is included and the end point is not. A step so small
/// that the path would exceed twice the grid width at 1 m spacing is
/// rejected with [`BedmapError::InvalidStep`]. When both ends
/// share an x coordinate the path steps along y; otherwise it steps along x
/// and y follows the straight line between the ends.
pub fn path_between(start: LatLon, end: LatLon, step_m: f64) -> Result<Vec<PolarXY>> {
    if !(step_m.is_finite() && step_m > 0.0) {
        return Err(BedmapError::InvalidStep(step_m));
    }

    let a = project(start).ok_or(BedmapError::EndpointOutsideGrid {
        lat: start.lat,
        lon: start.lon,
    })?;
    let b = project(end).ok_or(BedmapError::EndpointOutsideGrid {
        lat: end.lat,
        lon: end.lon,
    })?;

    let vertical = is_close(a.x, b.x);
    let span = if vertical { b.y - a.y } else { b.x - a.x };
    if span.abs() / step_m > MAX_PATH_POINTS {
        return Err(BedmapError::InvalidStep(step_m));
    }

    if vertical {
        Ok(arange(a.y, b.y, step_m)
            .into_iter()
            .map(|y| PolarXY::new(a.x, y))
            .collect())
    } else {
        let slope = (b.y - a.y) / (b.x - a.x);
        Ok(arange(a.x, b.x, step_m)
            .into_iter()
            .map(|x| PolarXY::new(x, a.y + (x - a.x) * slope))
            .collect())
    }
}

/// Same tolerance as a default `allclose`: 1e-8 absolute plus 1e-5 relative.
fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

/// Half-open range from `from` toward `to` in steps of `step` (always positive).
fn arange(from: f64, to: f64, step: f64) -> Vec<f64> {
    let count = ((to - from).abs() / step).ceil() as usize;
    let signed = if to >= from { step } else { -step };
    (0..count).map(|i| from + i as f64 * signed).collect()
}

fn kilometers(samples: &[Sample]) -> Vec<Option<f64>> {
    samples
        .iter()
        .map(|s| s.value().map(|v| v as f64 / 1000.0))
        .collect()
}

fn write_field<W: Write>(out: &mut W, value: Option<f64>) -> std::io::Result<()> {
    match value {
        Some(v) => write!(out, ",{}", v),
        None => write!(out, ","),
    }
}

/// Heights along a path, against along-track distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Path points in the projected plane.
    pub path: Vec<PolarXY>,
    /// Distance from the first point (km).
    pub range_km: Vec<f64>,
    /// Surface height (km).
    pub surface_km: Vec<Option<f64>>,
    /// Bed height (km).
    pub bed_km: Vec<Option<f64>>,
    /// Ice thickness (km).
    pub thickness_km: Vec<Option<f64>>,
}

impl Profile {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Lowest bed point, used as the floor of a plotted section.
    pub fn min_bed_km(&self) -> Option<f64> {
        self.bed_km.iter().flatten().copied().reduce(f64::min)
    }

    /// Write the profile as CSV. Missing samples are empty fields.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "range_km,x_m,y_m,surface_km,bed_km,thickness_km")?;
        for i in 0..self.len() {
            write!(out, "{},{},{}", self.range_km[i], self.path[i].x, self.path[i].y)?;
            write_field(out, self.surface_km[i])?;
            write_field(out, self.bed_km[i])?;
            write_field(out, self.thickness_km[i])?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Build a flat-Earth profile from `start` to `end`.
pub fn flat_profile(dataset: &Dataset, start: LatLon, end: LatLon, step_m: f64) -> Result<Profile> {
    let path = path_between(start, end, step_m)?;
    let xs: Vec<f64> = path.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = path.iter().map(|p| p.y).collect();

    let surface = dataset.surface(&xs, &ys, CoordMode::Projected)?;
    let bed = dataset.bed(&xs, &ys, CoordMode::Projected)?;
    let thickness = dataset.thickness(&xs, &ys, CoordMode::Projected)?;

    let range_km = match path.first() {
        Some(origin) => path
            .iter()
            .map(|p| ((p.x - origin.x).powi(2) + (p.y - origin.y).powi(2)).sqrt() / 1e3)
            .collect(),
        None => Vec::new(),
    };

    Ok(Profile {
        path,
        range_km,
        surface_km: kilometers(&surface),
        bed_km: kilometers(&bed),
        thickness_km: kilometers(&thickness),
    })
}

/// A profile lifted onto the ellipsoid.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvedProfile {
    /// The underlying flat profile.
    pub flat: Profile,
    /// Latitude of each path point (degrees).
    pub lat: Vec<f64>,
    /// Geocentric radius at each point (km).
    pub radius_km: Vec<f64>,
    /// Angle subtended from the mid-point of the path (rad).
    pub theta: Vec<f64>,
}

impl CurvedProfile {
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// Surface distance from the Earth's centre (km).
    pub fn surface_radius_km(&self) -> Vec<Option<f64>> {
        self.lift(&self.flat.surface_km)
    }

    /// Bed distance from the Earth's centre (km).
    pub fn bed_radius_km(&self) -> Vec<Option<f64>> {
        self.lift(&self.flat.bed_km)
    }

    fn lift(&self, heights: &[Option<f64>]) -> Vec<Option<f64>> {
        heights
            .iter()
            .zip(&self.radius_km)
            .map(|(h, r)| h.map(|h| h + r))
            .collect()
    }

    /// Write the profile as CSV, including plane coordinates of the surface
    /// and bed (`h = r sin θ`, `v = r cos θ`) ready for plotting.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "range_km,lat,radius_km,theta_rad,surface_h_km,surface_v_km,bed_h_km,bed_v_km,thickness_km"
        )?;
        let surface = self.surface_radius_km();
        let bed = self.bed_radius_km();
        for i in 0..self.len() {
            let (sin, cos) = self.theta[i].sin_cos();
            write!(
                out,
                "{},{},{},{}",
                self.flat.range_km[i], self.lat[i], self.radius_km[i], self.theta[i]
            )?;
            write_field(out, surface[i].map(|r| r * sin))?;
            write_field(out, surface[i].map(|r| r * cos))?;
            write_field(out, bed[i].map(|r| r * sin))?;
            write_field(out, bed[i].map(|r| r * cos))?;
            write_field(out, self.flat.thickness_km[i])?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Build a profile from `start` to `end` that follows the Earth's curvature.
pub fn curved_profile(
    dataset: &Dataset,
    start: LatLon,
    end: LatLon,
    step_m: f64,
) -> Result<CurvedProfile> {
    let flat = flat_profile(dataset, start, end, step_m)?;

    let lat: Vec<f64> = flat.path.iter().map(|&p| inverse(p).lat).collect();
    let radius_km: Vec<f64> = lat.iter().map(|&l| radius(l) / 1e3).collect();

    let mut theta: Vec<f64> = flat
        .range_km
        .iter()
        .zip(&radius_km)
        .map(|(d, r)| d / r)
        .collect();
    if let Some(&mid) = theta.get(theta.len() / 2) {
        theta.iter_mut().for_each(|t| *t -= mid);
    }

    Ok(CurvedProfile {
        flat,
        lat,
        radius_km,
        theta,
    })
}
