//! Geocentric radius of the WGS84 ellipsoid.

/// WGS84 equatorial radius (m).
pub const WGS84_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Distance from the Earth's centre to the WGS84 ellipsoid surface at
/// `lat` degrees, in meters.
pub fn radius(lat: f64) -> f64 {
    let a = WGS84_EQUATORIAL_RADIUS_M;
    let b = a * (1.0 - WGS84_FLATTENING);

    let lat = lat.to_radians();
    let sin2 = lat.sin().powi(2);
    let cos2 = lat.cos().powi(2);

    let a2 = a * a;
    let b2 = b * b;

    ((a2 * a2 * cos2 + b2 * b2 * sin2) / (a2 * cos2 + b2 * sin2)).sqrt()
}

/// [`radius`] over a slice of latitudes.
pub fn radius_batch(lats: &[f64]) -> Vec<f64> {
    lats.iter().map(|&lat| radius(lat)).collect()
}
