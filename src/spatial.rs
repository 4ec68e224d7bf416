//! Spatial candidate search and the bounded-attempt pair sampler.
//!
//! The sampler is agnostic to the search strategy: an R-tree restricts
//! candidates to a radius around the probe site, the linear fallback offers
//! everything and relies on the bounded scan prefix.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstar::{primitives::GeomWithData, RTree};
use tracing::debug;

use crate::geo::{haversine_km, KM_PER_DEG};
use crate::model::Site;

/// Scan prefix for unbounded candidate lists (the linear fallback).
const SCAN_LIMIT: usize = 400;
/// Attempt budget multiplier: sampling gives up after `pairs * 80` probes.
const ATTEMPTS_PER_PAIR: usize = 80;

/// Radius-bounded candidate lookup over the site set, by index.
pub trait NeighborSearch: Sync {
    /// Indices of sites within roughly `radius_deg` degrees of the probe,
    /// in no particular order. May over-approximate.
    fn within_radius(&self, lat: f64, lon: f64, radius_deg: f64) -> Vec<usize>;

    /// How many shuffled candidates the sampler distance-checks per probe.
    /// `None` means scan everything `within_radius` returned; only searches
    /// that cannot restrict by radius need a bound.
    fn scan_limit(&self) -> Option<usize> {
        None
    }
}

/// R-tree backed search. Points stored `[lon, lat]`.
pub struct RTreeIndex {
    tree: RTree<GeomWithData<[f64; 2], usize>>,
}

impl RTreeIndex {
    pub fn build(sites: &[Site]) -> Self {
        let points: Vec<GeomWithData<[f64; 2], usize>> = sites
            .iter()
            .enumerate()
            .map(|(i, s)| GeomWithData::new([s.longitude, s.latitude], i))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }
}

impl NeighborSearch for RTreeIndex {
    fn within_radius(&self, lat: f64, lon: f64, radius_deg: f64) -> Vec<usize> {
        self.tree
            .locate_within_distance([lon, lat], radius_deg * radius_deg)
            .map(|p| p.data)
            .collect()
    }
}

/// Exhaustive fallback when no index is wanted; the sampler's scan prefix
/// keeps the cost bounded.
pub struct LinearScan {
    n: usize,
}

impl LinearScan {
    pub fn new(sites: &[Site]) -> Self {
        Self { n: sites.len() }
    }
}

impl NeighborSearch for LinearScan {
    fn within_radius(&self, _lat: f64, _lon: f64, _radius_deg: f64) -> Vec<usize> {
        (0..self.n).collect()
    }

    fn scan_limit(&self) -> Option<usize> {
        Some(SCAN_LIMIT)
    }
}

/// Sample up to `num_pairs` site index pairs whose straight-line distance
/// lies in `[min_km, max_km]`.
///
/// Deterministic for a given seed. Returning fewer pairs than requested is
/// expected when the band is tight for the available geography.
pub fn sample_pairs(
    sites: &[Site],
    index: &dyn NeighborSearch,
    min_km: f64,
    max_km: f64,
    num_pairs: usize,
    forbid_same_city: bool,
    seed: u64,
) -> Vec<(usize, usize)> {
    let n = sites.len();
    if n < 2 || num_pairs == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(num_pairs);
    let max_attempts = num_pairs * ATTEMPTS_PER_PAIR;
    let radius_deg = max_km / KM_PER_DEG;

    let scan = index.scan_limit().unwrap_or(usize::MAX);

    let mut attempts = 0;
    while out.len() < num_pairs && attempts < max_attempts {
        attempts += 1;
        let i = rng.random_range(0..n);
        let si = &sites[i];
        let mut candidates = index.within_radius(si.latitude, si.longitude, radius_deg);
        candidates.shuffle(&mut rng);
        let mut found = None;
        for &j in candidates.iter().take(scan) {
            if j == i {
                continue;
            }
            let sj = &sites[j];
            if forbid_same_city && sj.city == si.city && sj.country == si.country {
                continue;
            }
            let d = haversine_km(si.latitude, si.longitude, sj.latitude, sj.longitude);
            if d >= min_km && d <= max_km {
                found = Some(j);
                break;
            }
        }
        if let Some(j) = found {
            out.push((i, j));
        }
    }
    if out.len() < num_pairs {
        debug!(
            requested = num_pairs,
            sampled = out.len(),
            min_km,
            max_km,
            "pair sampling under target"
        );
    }
    out
}
