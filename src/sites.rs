//! Site placement: scatter sites around city anchors with role-weighted
//! categories and platforms, then complete (platform, category) coverage.

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::{Result, TopoError};
use crate::geo::jitter_latlon;
use crate::model::{Category, Site};
use crate::world::{
    self, Location, CATEGORY_WEIGHTS_HOT, CATEGORY_WEIGHTS_HUB, CATEGORY_WEIGHTS_NORMAL,
    PLATFORMS, PLATFORM_WEIGHTS_HOT, PLATFORM_WEIGHTS_HUB, PLATFORM_WEIGHTS_NORMAL,
    SITE_JITTER_KM,
};

/// Cumulative-sum inversion over a weight slice. Negative weights count as
/// zero; an all-zero table falls through to the last index.
pub fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    let total = if total > 0.0 { total } else { 1.0 };
    let r = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w.max(0.0);
        if r <= acc {
            return i;
        }
    }
    weights.len() - 1
}

/// Weighted pick over `(item, weight)` pairs.
pub fn weighted_pick<'a, T, R: Rng>(table: &'a [(T, f64)], rng: &mut R) -> &'a T {
    let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
    &table[weighted_index(&weights, rng)].0
}

fn category_for(hub: bool, hot: bool, rng: &mut impl Rng) -> Category {
    let table = if hub {
        CATEGORY_WEIGHTS_HUB
    } else if hot {
        CATEGORY_WEIGHTS_HOT
    } else {
        CATEGORY_WEIGHTS_NORMAL
    };
    *weighted_pick(table, rng)
}

fn platform_for(sid: usize, hub: bool, hot: bool, rng: &mut impl Rng) -> &'static str {
    // first pass over the platform list is deterministic so every platform
    // shows up early regardless of the weight tables
    if sid <= PLATFORMS.len() {
        return PLATFORMS[(sid - 1) % PLATFORMS.len()];
    }
    let weights = if hub {
        PLATFORM_WEIGHTS_HUB
    } else if hot {
        PLATFORM_WEIGHTS_HOT
    } else {
        PLATFORM_WEIGHTS_NORMAL
    };
    PLATFORMS[weighted_index(weights, rng)]
}

/// Scatter sites around every anchor location.
///
/// Hot cities get `hot_city_multiplier` sites, the rest `sites_per_city`.
/// Coordinates are jittered off the anchor by a uniform 2-30 km radius.
pub fn build_sites<R: Rng>(
    locations: &[Location],
    sites_per_city: usize,
    hot_city_multiplier: usize,
    timestamp: &str,
    rng: &mut R,
) -> Result<Vec<Site>> {
    if locations.is_empty() {
        return Err(TopoError::EmptyLocationTable);
    }
    let mut sites = Vec::new();
    let mut sid = 1usize;
    for &(country, city, lat, lon) in locations {
        let hot = world::is_hot(city);
        let hub = world::is_hub(city);
        let count = if hot { hot_city_multiplier } else { sites_per_city };
        for _ in 0..count {
            let radius = rng.random_range(SITE_JITTER_KM.0..=SITE_JITTER_KM.1);
            let (jlat, jlon) = jitter_latlon(lat, lon, radius, rng);
            let network = category_for(hub, hot, rng);
            let platform = platform_for(sid, hub, hot, rng);
            sites.push(Site {
                site_id: format!("SITE_{:06}", sid),
                site_name: format!("{}-{}", city, sid % 100),
                country: country.to_string(),
                city: city.to_string(),
                platform: platform.to_string(),
                network,
                latitude: round6(jlat),
                longitude: round6(jlon),
                last_modified_at: timestamp.to_string(),
                is_deleted: false,
            });
            sid += 1;
        }
    }
    ensure_platform_category_coverage(&mut sites);
    info!(sites = sites.len(), "placed sites (coverage ensured)");
    Ok(sites)
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Reassign sites so every (platform, category) combination appears at
/// least once. Victims are taken hub-city-first, then hot-city, then the
/// rest in creation order, and a site is never stolen from a combination it
/// is the sole holder of.
fn ensure_platform_category_coverage(sites: &mut [Site]) {
    let mut pair_counts: FxHashMap<(String, Category), usize> = FxHashMap::default();
    for s in sites.iter() {
        *pair_counts.entry((s.platform.clone(), s.network)).or_insert(0) += 1;
    }

    let mut missing: Vec<(&'static str, Category)> = Vec::new();
    for &p in PLATFORMS {
        for n in Category::ALL {
            if !pair_counts.contains_key(&(p.to_string(), n)) {
                missing.push((p, n));
            }
        }
    }
    if missing.is_empty() {
        return;
    }

    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by_key(|&i| {
        (
            !world::is_hub(&sites[i].city),
            !world::is_hot(&sites[i].city),
        )
    });

    let mut cursor = 0usize;
    let mut changed = 0usize;
    for (p, n) in missing {
        // find the next victim that isn't sole coverage for its own pair
        let mut scanned = 0;
        while scanned < order.len() {
            let idx = order[cursor % order.len()];
            cursor += 1;
            scanned += 1;
            let key = (sites[idx].platform.clone(), sites[idx].network);
            if pair_counts.get(&key).copied().unwrap_or(0) > 1 {
                *pair_counts.get_mut(&key).unwrap() -= 1;
                sites[idx].platform = p.to_string();
                sites[idx].network = n;
                *pair_counts.entry((p.to_string(), n)).or_insert(0) += 1;
                changed += 1;
                break;
            }
        }
    }
    if changed > 0 {
        info!(adjusted = changed, "completed platform x category coverage");
    }
}
