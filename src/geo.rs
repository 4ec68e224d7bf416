//! Great-circle geometry, coordinate jitter and WKT encoding.
//!
//! All coordinates are decimal degrees, `(lat, lon)` tuples in argument
//! order; WKT output is `lon lat`, as the format requires.

use geo::HaversineDistance;
use geo::Point;
use rand::Rng;

/// Rough km-per-degree at the equator, used to convert km radii to degrees.
pub const KM_PER_DEG: f64 = 111.0;

/// Great-circle distance in km (mean Earth radius 6371.0088 km).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = Point::new(lon1, lat1);
    let p2 = Point::new(lon2, lat2);
    p1.haversine_distance(&p2) / 1000.0
}

/// Perturb a coordinate by a uniform offset bounded by `km`.
///
/// Longitude jitter is scaled by 1/cos(lat) to approximate an equal-area
/// perturbation; the cosine is floored at 0.2 so high latitudes don't blow up.
pub fn jitter_latlon<R: Rng>(lat: f64, lon: f64, km: f64, rng: &mut R) -> (f64, f64) {
    let dlat = (km / KM_PER_DEG) * (rng.random::<f64>() - 0.5) * 2.0;
    let scale = lat.to_radians().cos().max(0.2);
    let dlon = (km / (KM_PER_DEG * scale)) * (rng.random::<f64>() - 0.5) * 2.0;
    (lat + dlat, lon + dlon)
}

/// Bearing from `a` to `b` in degrees [0, 360), flat-plane atan2.
///
/// Only used for bucketing edges into coarse sectors, so the flat
/// approximation is fine.
pub fn bearing_deg(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dy = b.0 - a.0;
    let dx = b.1 - a.1;
    (dy.atan2(dx).to_degrees() + 360.0) % 360.0
}

/// `n_mid` linearly interpolated points between the endpoints (exclusive),
/// each independently jittered to fake a plausible routed curve.
pub fn interpolate_points<R: Rng>(
    a_lat: f64,
    a_lon: f64,
    b_lat: f64,
    b_lon: f64,
    n_mid: usize,
    jitter_km: f64,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    let mut pts = Vec::with_capacity(n_mid);
    for i in 1..=n_mid {
        let t = i as f64 / (n_mid + 1) as f64;
        let mut lat = a_lat + t * (b_lat - a_lat);
        let mut lon = a_lon + t * (b_lon - a_lon);
        if jitter_km > 0.0 {
            (lat, lon) = jitter_latlon(lat, lon, jitter_km, rng);
        }
        pts.push((lat, lon));
    }
    pts
}

/// WKT `POINT(lon lat)`.
pub fn point_wkt(lat: f64, lon: f64) -> String {
    format!("POINT({} {})", lon, lat)
}

/// WKT `LINESTRING(lon lat, ...)` over the given `(lat, lon)` sequence.
///
/// Consecutive points closer than 1e-7 degrees on both axes are collapsed;
/// if fewer than two distinct points remain the survivor is duplicated so
/// the geometry always has at least two vertices.
pub fn linestring_wkt(coords: &[(f64, f64)]) -> String {
    let mut clean: Vec<(f64, f64)> = Vec::with_capacity(coords.len());
    for &(lat, lon) in coords {
        if let Some(&(plat, plon)) = clean.last() {
            if (lat - plat).abs() < 1e-7 && (lon - plon).abs() < 1e-7 {
                continue;
            }
        }
        clean.push((lat, lon));
    }
    if clean.len() < 2 {
        let only = clean.first().copied().unwrap_or((0.0, 0.0));
        clean = vec![only, only];
    }
    let parts: Vec<String> = clean
        .iter()
        .map(|(lat, lon)| format!("{} {}", lon, lat))
        .collect();
    format!("LINESTRING({})", parts.join(", "))
}
