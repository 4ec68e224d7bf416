//! Routed-path synthesis: waypoint selection and geometry fabrication.
//!
//! Links are drawn as plausible curved paths instead of straight lines:
//! long-haul tiers detour through super-hubs and coastal gateways, every
//! segment is interpolated and jittered at tier-specific density.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::geo::{haversine_km, interpolate_points, jitter_latlon, linestring_wkt};
use crate::hubs::HubHierarchy;
use crate::model::Site;
use crate::tier::Tier;
use crate::world;

#[derive(Debug, Clone)]
pub struct RoutedPath {
    /// Sum of per-segment great-circle distances, km, floored at the
    /// straight-line distance and rounded to 0.1.
    pub distance_km: f64,
    pub wkt: String,
}

/// Routed geometry under the tier's admission band. `None` when either the
/// routed length falls outside [min, max*1.25] or the straight line outside
/// [min, max*1.5].
pub fn routed_geometry<R: Rng>(
    tier: Tier,
    a: &Site,
    b: &Site,
    sites: &[Site],
    hubs: &HubHierarchy,
    rng: &mut R,
) -> Option<RoutedPath> {
    let (dmin, dmax) = tier.range_km();
    let (total, straight, coords) = build_path(tier, a, b, sites, hubs, rng);
    if total < dmin || total > dmax * 1.25 || straight < dmin || straight > dmax * 1.5 {
        trace!(tier = %tier, total, straight, "geometry rejected by band");
        return None;
    }
    Some(RoutedPath {
        distance_km: round1(total),
        wkt: linestring_wkt(&coords),
    })
}

/// Routed geometry with the band test skipped. Only the healing escape
/// valve uses this: guaranteed connectivity outranks band purity there.
pub fn forced_geometry<R: Rng>(
    tier: Tier,
    a: &Site,
    b: &Site,
    sites: &[Site],
    hubs: &HubHierarchy,
    rng: &mut R,
) -> RoutedPath {
    let (total, _, coords) = build_path(tier, a, b, sites, hubs, rng);
    RoutedPath {
        distance_km: round1(total),
        wkt: linestring_wkt(&coords),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn build_path<R: Rng>(
    tier: Tier,
    a: &Site,
    b: &Site,
    sites: &[Site],
    hubs: &HubHierarchy,
    rng: &mut R,
) -> (f64, f64, Vec<(f64, f64)>) {
    let waypoints = choose_waypoints(tier, a, b, sites, hubs, rng);
    let (per_mid, jitter) = tier.segment_density();

    let mut path = Vec::with_capacity(waypoints.len() + 2);
    path.push(a.coord());
    path.extend(waypoints);
    path.push(b.coord());

    let mut coords = vec![path[0]];
    let mut total = 0.0;
    for win in path.windows(2) {
        let (u, v) = (win[0], win[1]);
        let mids = interpolate_points(u.0, u.1, v.0, v.1, per_mid, jitter, rng);
        coords.extend(mids);
        coords.push(v);
        total += haversine_km(u.0, u.1, v.0, v.1);
    }

    let straight = haversine_km(a.latitude, a.longitude, b.latitude, b.longitude);
    (total.max(straight), straight, coords)
}

/// Pick 0..K waypoints between the endpoints: regional super-hubs first,
/// coastal gateways for long-haul tiers, then jittered mid-course anchors,
/// deduplicated and dispersed along the straight line so they don't bunch.
fn choose_waypoints<R: Rng>(
    tier: Tier,
    a: &Site,
    b: &Site,
    sites: &[Site],
    hubs: &HubHierarchy,
    rng: &mut R,
) -> Vec<(f64, f64)> {
    let (min_h, max_h) = tier.waypoint_range();
    if max_h == 0 {
        return Vec::new();
    }

    let mut by_city: FxHashMap<&str, Vec<&Site>> = FxHashMap::default();
    for s in sites {
        by_city.entry(s.city.as_str()).or_default().push(s);
    }
    let nearest_city_site = |city: &str, lat0: f64, lon0: f64| -> Option<(f64, f64)> {
        by_city.get(city)?.iter().min_by(|x, y| {
            let dx = haversine_km(lat0, lon0, x.latitude, x.longitude);
            let dy = haversine_km(lat0, lon0, y.latitude, y.longitude);
            dx.total_cmp(&dy)
        }).map(|s| s.coord())
    };

    let (a_lat, a_lon) = a.coord();
    let (b_lat, b_lon) = b.coord();
    let mut candidates: Vec<(f64, f64)> = Vec::new();

    // origin/destination region super-hubs
    for city in hubs.super_hubs(world::region_of(&a.country)).iter().take(2) {
        if let Some(p) = nearest_city_site(city, a_lat, a_lon) {
            candidates.push(p);
        }
    }
    for city in hubs.super_hubs(world::region_of(&b.country)).iter().take(2) {
        if let Some(p) = nearest_city_site(city, b_lat, b_lon) {
            candidates.push(p);
        }
    }

    let mid_lat = (a_lat + b_lat) / 2.0;
    let mid_lon = (a_lon + b_lon) / 2.0;

    if tier.uses_coastal_gateways() {
        for &city in world::COASTAL_GATEWAYS {
            if let Some(p) = nearest_city_site(city, mid_lat, mid_lon) {
                candidates.push(p);
            }
        }
    }

    // randomized mid-course anchors
    for km in [20.0, 60.0, 120.0] {
        candidates.push(jitter_latlon(mid_lat, mid_lon, km, rng));
    }

    if world::is_hub(&b.city) {
        if let Some(p) = nearest_city_site(&b.city, b_lat, b_lon) {
            candidates.push(p);
        }
    }

    // dedup at ~100 m resolution
    let mut seen = rustc_hash::FxHashSet::default();
    let mut dedup: Vec<(f64, f64)> = Vec::new();
    for p in candidates {
        let key = ((p.0 * 1000.0).round() as i64, (p.1 * 1000.0).round() as i64);
        if seen.insert(key) {
            dedup.push(p);
        }
    }

    let straight = haversine_km(a_lat, a_lon, b_lat, b_lon);
    let proj_t = |lat: f64, lon: f64| haversine_km(a_lat, a_lon, lat, lon) / straight.max(1e-6);

    let slots: &[f64] = if max_h <= 2 {
        &[1.0 / 3.0, 2.0 / 3.0]
    } else {
        &[0.25, 0.5, 0.75]
    };
    let mut scored: Vec<(f64, (f64, f64))> = Vec::with_capacity(dedup.len() * slots.len());
    for &(lat, lon) in &dedup {
        for &t in slots {
            scored.push((
                (proj_t(lat, lon) - t).abs() + rng.random::<f64>() * 0.05,
                (lat, lon),
            ));
        }
    }
    scored.shuffle(rng);
    scored.sort_by(|x, y| x.0.total_cmp(&y.0));

    let k = rng.random_range(min_h..=max_h);
    let mut picked = Vec::with_capacity(k);
    let mut used_buckets = rustc_hash::FxHashSet::default();
    for (_, p) in scored {
        // one waypoint per projection decile keeps them spread out
        let bucket = (proj_t(p.0, p.1) * 10.0) as i64;
        if !used_buckets.insert(bucket) {
            continue;
        }
        picked.push(p);
        if picked.len() >= k {
            break;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hubs::pick_super_hubs;
    use crate::model::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn site(n: usize, country: &str, city: &str, lat: f64, lon: f64, cat: Category) -> Site {
        Site {
            site_id: format!("SITE_{:06}", n),
            site_name: format!("{}-{}", city, n),
            country: country.to_string(),
            city: city.to_string(),
            platform: "Juniper MX960".to_string(),
            network: cat,
            latitude: lat,
            longitude: lon,
            last_modified_at: "t".to_string(),
            is_deleted: false,
        }
    }

    #[test]
    fn test_routed_length_never_below_straight_line() {
        let a = site(1, "United Kingdom", "London", 51.5074, -0.1278, Category::CoreBackbone);
        let b = site(2, "United States", "New York", 40.7128, -74.0060, Category::CoreBackbone);
        let sites = vec![a.clone(), b.clone()];
        let hubs = pick_super_hubs(&sites, 4);
        let mut rng = StdRng::seed_from_u64(3);
        let straight = haversine_km(a.latitude, a.longitude, b.latitude, b.longitude);
        for _ in 0..20 {
            if let Some(p) = routed_geometry(Tier::CoreBackbone, &a, &b, &sites, &hubs, &mut rng) {
                assert!(p.distance_km + 0.05 >= straight);
                assert!(p.wkt.starts_with("LINESTRING("));
            }
        }
    }

    #[test]
    fn test_band_rejection() {
        // 5 km apart: far below the Core Backbone 600 km floor
        let a = site(1, "France", "Paris", 48.85, 2.35, Category::CoreBackbone);
        let b = site(2, "France", "Paris", 48.89, 2.36, Category::CoreBackbone);
        let sites = vec![a.clone(), b.clone()];
        let hubs = pick_super_hubs(&sites, 4);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(routed_geometry(Tier::CoreBackbone, &a, &b, &sites, &hubs, &mut rng).is_none());
    }

    #[test]
    fn test_forced_geometry_ignores_band() {
        let a = site(1, "France", "Paris", 48.85, 2.35, Category::CoreBackbone);
        let b = site(2, "France", "Paris", 48.89, 2.36, Category::CoreBackbone);
        let sites = vec![a.clone(), b.clone()];
        let hubs = pick_super_hubs(&sites, 4);
        let mut rng = StdRng::seed_from_u64(3);
        let p = forced_geometry(Tier::RegionalNetwork, &a, &b, &sites, &hubs, &mut rng);
        assert!(p.distance_km > 0.0);
        assert!(p.wkt.starts_with("LINESTRING("));
    }
}
