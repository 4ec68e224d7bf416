//! Super-hub hierarchy: the highest-scoring hub cities per region, used as
//! preferred waypoints for long-haul routing.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::model::Site;
use crate::world;

/// Region -> ordered super-hub city names. Computed once per run, read-only
/// afterwards.
#[derive(Debug, Default, Clone)]
pub struct HubHierarchy {
    by_region: FxHashMap<&'static str, Vec<String>>,
}

impl HubHierarchy {
    /// Super-hub cities for a region, best first. Empty for regions with no
    /// qualifying city.
    pub fn super_hubs(&self, region: &str) -> &[String] {
        self.by_region.get(region).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Score each (country, city) group by site count plus hub/hot bonuses and
/// keep up to `per_region` hub-flagged cities per region.
pub fn pick_super_hubs(sites: &[Site], per_region: usize) -> HubHierarchy {
    // group in first-encounter order so ties break deterministically
    let mut index: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    let mut groups: Vec<((&str, &str), usize)> = Vec::new();
    for s in sites {
        let key = (s.country.as_str(), s.city.as_str());
        match index.get(&key) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(key, groups.len());
                groups.push((key, 1));
            }
        }
    }

    let mut scored: Vec<((&str, &str), i64)> = groups
        .into_iter()
        .map(|((country, city), count)| {
            let mut score = count as i64;
            if world::is_hub(city) {
                score += 10;
            }
            if world::is_hot(city) {
                score += 5;
            }
            ((country, city), score)
        })
        .collect();
    scored.sort_by_key(|&(_, score)| -score);

    let mut by_region: FxHashMap<&'static str, Vec<String>> = FxHashMap::default();
    for ((country, city), _) in scored {
        if !world::is_hub(city) {
            continue;
        }
        let region = world::region_of(country);
        let entry = by_region.entry(region).or_default();
        if entry.len() < per_region {
            entry.push(city.to_string());
        }
    }
    debug!(regions = by_region.len(), "selected super-hubs");
    HubHierarchy { by_region }
}
