//! Orchestration: sites -> hubs -> parallel tier synthesis -> repair.
//!
//! Tier tasks are pure given (sites, hubs, tier, derived seed) and own
//! their cap state, so they fan out over the rayon pool; results are
//! collected in tier-declaration order, never arrival order, and final ids
//! are assigned in a second sequential pass. Repair mutates one shared
//! adjacency and stays single-threaded.

use chrono::{DateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::Result;
use crate::hubs::pick_super_hubs;
use crate::model::{Link, Site};
use crate::repair::{connect_components, heal_low_degree};
use crate::sites::build_sites;
use crate::spatial::RTreeIndex;
use crate::synth::{metro_ring_pairs, synthesize_tier};
use crate::tier::Tier;
use crate::world::{self, Location};

use rand::rngs::StdRng;
use rand::SeedableRng;

const SUPER_HUBS_PER_REGION: usize = 4;
const METRO_RING_NEIGHBORS: usize = 4;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub sites_per_city: usize,
    pub hot_city_multiplier: usize,
    pub enforce_policy: bool,
    /// Stamped on every record. Injectable so identical seeds reproduce
    /// byte-identical output; defaults to the wall clock.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            sites_per_city: world::DEFAULT_SITES_PER_CITY,
            hot_city_multiplier: world::HOT_CITY_MULTIPLIER,
            enforce_policy: true,
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub sites: Vec<Site>,
    pub links: Vec<Link>,
}

/// Generate a topology over the built-in world location table.
pub fn generate(config: &GeneratorConfig) -> Result<Topology> {
    generate_from(world::LOCATIONS, config)
}

/// Generate a topology over a caller-supplied location table.
pub fn generate_from(locations: &[Location], config: &GeneratorConfig) -> Result<Topology> {
    let ts = config
        .timestamp
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Micros, true);

    let mut site_rng = StdRng::seed_from_u64(config.seed ^ xxh3_64(b"sites"));
    let sites = build_sites(
        locations,
        config.sites_per_city,
        config.hot_city_multiplier,
        &ts,
        &mut site_rng,
    )?;

    let hubs = pick_super_hubs(&sites, SUPER_HUBS_PER_REGION);
    let rings = metro_ring_pairs(&sites, METRO_RING_NEIGHBORS);
    let index = RTreeIndex::build(&sites);

    // one task per tier; a panicking tier contributes nothing instead of
    // taking its siblings down
    let per_tier: Vec<Vec<Link>> = Tier::ALL
        .par_iter()
        .map(|&tier| {
            let seed_pairs: &[(usize, usize)] = if tier == Tier::MetroNetwork {
                &rings
            } else {
                &[]
            };
            catch_unwind(AssertUnwindSafe(|| {
                synthesize_tier(
                    tier,
                    &sites,
                    &hubs,
                    &index,
                    seed_pairs,
                    config.seed,
                    config.enforce_policy,
                    &ts,
                )
            }))
            .unwrap_or_else(|_| {
                error!(tier = %tier, "tier synthesis panicked, continuing without it");
                Vec::new()
            })
        })
        .collect();

    let mut links: Vec<Link> = per_tier.into_iter().flatten().collect();
    assign_link_ids(&mut links);

    let healed = heal_low_degree(&sites, &links, &hubs, config.seed, &ts);
    links.extend(healed);
    let bridges = connect_components(&sites, &links, &hubs, config.seed, &ts);
    links.extend(bridges);
    assign_link_ids(&mut links);

    info!(
        sites = sites.len(),
        links = links.len(),
        seed = config.seed,
        "topology generation complete"
    );
    Ok(Topology { sites, links })
}

fn assign_link_ids(links: &mut [Link]) {
    for (idx, link) in links.iter_mut().enumerate() {
        link.link_id = format!("LINK_{:06}", idx + 1);
    }
}
