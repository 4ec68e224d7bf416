//! Per-tier edge synthesis: turn sampled candidate pairs into admitted
//! links under policy, degree, city-pair and sector caps.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::info;

use crate::geo::{bearing_deg, haversine_km};
use crate::hubs::HubHierarchy;
use crate::model::{Link, Site};
use crate::path::routed_geometry;
use crate::spatial::{sample_pairs, NeighborSearch};
use crate::tier::{Tier, SECTOR_DEG};

/// Candidate pairs sampled per budgeted link.
const OVERSAMPLE: usize = 2;
/// Share of the Metro budget reserved for same-city ring seeds.
const METRO_RING_SHARE: f64 = 0.3;

/// Cap counters for one tier. Owned by exactly one synthesis task (or the
/// sequential repair phase); never shared across tasks.
pub struct CapState {
    tier: Tier,
    degree: FxHashMap<usize, usize>,
    pair_counts: FxHashMap<(String, String), usize>,
    sector_counts: FxHashMap<(usize, i64), usize>,
}

impl CapState {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            degree: FxHashMap::default(),
            pair_counts: FxHashMap::default(),
            sector_counts: FxHashMap::default(),
        }
    }

    fn city_key(a: &Site, b: &Site) -> (String, String) {
        if a.city <= b.city {
            (a.city.clone(), b.city.clone())
        } else {
            (b.city.clone(), a.city.clone())
        }
    }

    fn sector_of(a: &Site, b: &Site) -> i64 {
        (bearing_deg(a.coord(), b.coord()) / SECTOR_DEG) as i64
    }

    /// Would admitting the pair (i, j) keep all caps intact?
    pub fn admits(&self, sites: &[Site], i: usize, j: usize) -> bool {
        let cap = self.tier.degree_cap();
        if self.degree.get(&i).copied().unwrap_or(0) >= cap {
            return false;
        }
        if self.degree.get(&j).copied().unwrap_or(0) >= cap {
            return false;
        }
        let (a, b) = (&sites[i], &sites[j]);
        if let Some(pair_cap) = self.tier.pair_cap() {
            let key = Self::city_key(a, b);
            if self.pair_counts.get(&key).copied().unwrap_or(0) >= pair_cap {
                return false;
            }
        }
        if let Some(sector_cap) = self.tier.sector_cap() {
            // origin sector only; enough to quell starbursts
            let key = (i, Self::sector_of(a, b));
            if self.sector_counts.get(&key).copied().unwrap_or(0) >= sector_cap {
                return false;
            }
        }
        true
    }

    pub fn bump(&mut self, sites: &[Site], i: usize, j: usize) {
        *self.degree.entry(i).or_insert(0) += 1;
        *self.degree.entry(j).or_insert(0) += 1;
        let (a, b) = (&sites[i], &sites[j]);
        if self.tier.pair_cap().is_some() {
            *self.pair_counts.entry(Self::city_key(a, b)).or_insert(0) += 1;
        }
        if self.tier.sector_cap().is_some() {
            *self
                .sector_counts
                .entry((i, Self::sector_of(a, b)))
                .or_insert(0) += 1;
        }
    }
}

/// Same-city k-nearest-neighbor pairs for cities with at least three
/// sites. Seeds the Metro tier with clean ring/ladder structure before the
/// random candidates run.
pub fn metro_ring_pairs(sites: &[Site], k_neighbors: usize) -> Vec<(usize, usize)> {
    let mut by_city: FxHashMap<(&str, &str), Vec<usize>> = FxHashMap::default();
    let mut city_order: Vec<(&str, &str)> = Vec::new();
    for (idx, s) in sites.iter().enumerate() {
        let key = (s.country.as_str(), s.city.as_str());
        let entry = by_city.entry(key).or_default();
        if entry.is_empty() {
            city_order.push(key);
        }
        entry.push(idx);
    }

    let mut seen = FxHashSet::default();
    let mut pairs = Vec::new();
    for key in city_order {
        let idxs = &by_city[&key];
        if idxs.len() < 3 {
            continue;
        }
        for &i in idxs {
            let mut dists: Vec<(f64, usize)> = idxs
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| {
                    let d = haversine_km(
                        sites[i].latitude,
                        sites[i].longitude,
                        sites[j].latitude,
                        sites[j].longitude,
                    );
                    (d, j)
                })
                .collect();
            dists.sort_by(|x, y| x.0.total_cmp(&y.0));
            for &(_, j) in dists.iter().take(k_neighbors) {
                let pair = (i.min(j), i.max(j));
                if seen.insert(pair) {
                    pairs.push(pair);
                }
            }
        }
    }
    pairs
}

/// Synthesize one tier's links.
///
/// `seed_pairs` are admitted first (capped at 30% of the budget), then the
/// spatially sampled candidates, all through the same cap state. Pure given
/// its inputs: the tier seed derives from the global seed and the tier
/// label, so tiers can run concurrently without sharing generator state.
pub fn synthesize_tier(
    tier: Tier,
    sites: &[Site],
    hubs: &HubHierarchy,
    index: &dyn NeighborSearch,
    seed_pairs: &[(usize, usize)],
    global_seed: u64,
    enforce_policy: bool,
    timestamp: &str,
) -> Vec<Link> {
    let budget = tier.budget();
    let (min_km, max_km) = tier.range_km();
    let seed = tier.seed(global_seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let sampled = sample_pairs(
        sites,
        index,
        min_km,
        max_km,
        budget * OVERSAMPLE,
        tier.forbid_same_city(),
        seed,
    );
    let ring_quota = (budget as f64 * METRO_RING_SHARE) as usize;
    let candidates = seed_pairs
        .iter()
        .take(ring_quota)
        .chain(sampled.iter())
        .copied();

    let mut caps = CapState::new(tier);
    let mut links = Vec::new();
    for (i, j) in candidates {
        if links.len() >= budget {
            break;
        }
        if i == j {
            continue;
        }
        let (a, b) = (&sites[i], &sites[j]);
        if enforce_policy && !tier.allows(a.network, b.network) {
            continue;
        }
        if !caps.admits(sites, i, j) {
            continue;
        }
        let Some(routed) = routed_geometry(tier, a, b, sites, hubs, &mut rng) else {
            continue;
        };
        caps.bump(sites, i, j);
        links.push(Link {
            link_id: format!("{}__TMP_{:06}", tier.label(), links.len() + 1),
            site_a_id: a.site_id.clone(),
            site_b_id: b.site_id.clone(),
            link_type: tier,
            link_distance: routed.distance_km,
            link_wkt: routed.wkt,
            last_modified_at: timestamp.to_string(),
            is_deleted: false,
        });
    }

    info!(
        tier = %tier,
        target = budget,
        built = links.len(),
        min_km,
        max_km,
        "tier synthesis done"
    );
    links
}
