use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};

use topoforge::geo::haversine_km;
use topoforge::hubs::pick_super_hubs;
use topoforge::model::{Category, Site};
use topoforge::path::routed_geometry;
use topoforge::pipeline::{generate_from, GeneratorConfig};
use topoforge::repair::{build_adjacency, connect_components, connected_components, heal_low_degree};
use topoforge::sites::build_sites;
use topoforge::spatial::{sample_pairs, RTreeIndex};
use topoforge::synth::{synthesize_tier, CapState};
use topoforge::tier::Tier;
use topoforge::world::Location;

use rand::rngs::StdRng;
use rand::SeedableRng;

// chosen so every inter-city distance admits at least one of the Regional
// or Core bands: component bridges can always be built, and the healing
// escape valve never needs to fire
const MINI_WORLD: &[Location] = &[
    ("United Kingdom", "London", 51.5074, -0.1278),
    ("United Kingdom", "Manchester", 53.4808, -2.2426),
    ("France", "Paris", 48.8566, 2.3522),
    ("France", "Lyon", 45.7640, 4.8357),
    ("Germany", "Berlin", 52.5200, 13.4050),
    ("United States", "New York", 40.7128, -74.0060),
];

fn mini_config() -> GeneratorConfig {
    GeneratorConfig {
        seed: 42,
        sites_per_city: 4,
        hot_city_multiplier: 8,
        enforce_policy: true,
        timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
    }
}

fn raw_site(n: usize, country: &str, city: &str, lat: f64, lon: f64, cat: Category) -> Site {
    Site {
        site_id: format!("SITE_{:06}", n),
        site_name: format!("{}-{}", city, n),
        country: country.to_string(),
        city: city.to_string(),
        platform: "Cisco NCS5500".to_string(),
        network: cat,
        latitude: lat,
        longitude: lon,
        last_modified_at: "t".to_string(),
        is_deleted: false,
    }
}

#[test]
fn full_run_respects_link_invariants() {
    let topo = generate_from(MINI_WORLD, &mini_config()).unwrap();
    assert!(!topo.sites.is_empty());
    assert!(!topo.links.is_empty());

    let by_id: HashMap<&str, &Site> = topo
        .sites
        .iter()
        .map(|s| (s.site_id.as_str(), s))
        .collect();

    for l in &topo.links {
        assert_ne!(l.site_a_id, l.site_b_id, "{} is a self link", l.link_id);
        let a = by_id
            .get(l.site_a_id.as_str())
            .unwrap_or_else(|| panic!("{} references unknown {}", l.link_id, l.site_a_id));
        let b = by_id
            .get(l.site_b_id.as_str())
            .unwrap_or_else(|| panic!("{} references unknown {}", l.link_id, l.site_b_id));
        let straight = haversine_km(a.latitude, a.longitude, b.latitude, b.longitude);
        // routed path is never shorter than great-circle, modulo 0.1 rounding
        assert!(
            l.link_distance + 0.05 >= straight,
            "{}: routed {} < straight {}",
            l.link_id,
            l.link_distance,
            straight
        );
        assert!(l.link_wkt.starts_with("LINESTRING("));
        // every geometry keeps at least two vertices
        assert!(l.link_wkt.contains(','), "{} degenerate wkt", l.link_id);
    }
}

#[test]
fn full_run_links_stay_in_tier_band() {
    // this mini world never triggers the forced out-of-band escape valve:
    // every site always has an in-band candidate, so the band invariant
    // holds for the entire link set including repair additions
    let topo = generate_from(MINI_WORLD, &mini_config()).unwrap();
    for l in &topo.links {
        let (min_km, max_km) = l.link_type.range_km();
        assert!(
            l.link_distance >= min_km && l.link_distance <= max_km * 1.25,
            "{} ({}) length {} outside [{}, {}]",
            l.link_id,
            l.link_type,
            l.link_distance,
            min_km,
            max_km * 1.25
        );
    }
}

#[test]
fn degree_caps_hold_per_tier_before_repair() {
    let cfg = mini_config();
    let ts = "t";
    let mut rng = StdRng::seed_from_u64(1);
    let sites = build_sites(MINI_WORLD, cfg.sites_per_city, cfg.hot_city_multiplier, ts, &mut rng)
        .unwrap();
    let hubs = pick_super_hubs(&sites, 4);
    let index = RTreeIndex::build(&sites);

    for tier in Tier::ALL {
        let links = synthesize_tier(tier, &sites, &hubs, &index, &[], cfg.seed, true, ts);
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for l in &links {
            *degree.entry(l.site_a_id.as_str()).or_insert(0) += 1;
            *degree.entry(l.site_b_id.as_str()).or_insert(0) += 1;
        }
        for (id, d) in degree {
            assert!(
                d <= tier.degree_cap(),
                "{}: {} reached degree {} (cap {})",
                tier,
                id,
                d,
                tier.degree_cap()
            );
        }
    }
}

#[test]
fn topology_is_fully_connected_after_repair() {
    let topo = generate_from(MINI_WORLD, &mini_config()).unwrap();
    let adj = build_adjacency(&topo.sites, &topo.links);
    let comps = connected_components(&adj);
    assert_eq!(comps.len(), 1, "expected one component, got {}", comps.len());
}

#[test]
fn seed_determinism_is_byte_exact() {
    let a = generate_from(MINI_WORLD, &mini_config()).unwrap();
    let b = generate_from(MINI_WORLD, &mini_config()).unwrap();
    assert_eq!(a.sites, b.sites);
    assert_eq!(a.links, b.links);
    let ja = serde_json::to_string(&a.links).unwrap();
    let jb = serde_json::to_string(&b.links).unwrap();
    assert_eq!(ja, jb);
}

#[test]
fn different_seeds_differ() {
    let a = generate_from(MINI_WORLD, &mini_config()).unwrap();
    let mut cfg = mini_config();
    cfg.seed = 43;
    let b = generate_from(MINI_WORLD, &cfg).unwrap();
    assert_ne!(a.links, b.links);
}

#[test]
fn platform_category_coverage_after_placement() {
    // needs the full world: 17 platforms x 8 categories requires more sites
    // than the mini table carries
    let mut rng = StdRng::seed_from_u64(42);
    let sites = build_sites(topoforge::world::LOCATIONS, 30, 80, "t", &mut rng).unwrap();
    let have: HashSet<(&str, Category)> = sites
        .iter()
        .map(|s| (s.platform.as_str(), s.network))
        .collect();
    for &p in topoforge::world::PLATFORMS {
        for n in Category::ALL {
            assert!(have.contains(&(p, n)), "missing combination ({}, {})", p, n);
        }
    }
}

#[test]
fn core_backbone_pair_at_5000_km_yields_one_link() {
    // two anonymous equatorial cities almost exactly 5000 km apart
    let sites = vec![
        raw_site(1, "Testland", "Alpha", 0.0, 0.0, Category::CoreBackbone),
        raw_site(2, "Testland", "Beta", 0.0, 44.97, Category::CoreBackbone),
    ];
    let straight = haversine_km(0.0, 0.0, 0.0, 44.97);
    assert!((straight - 5000.0).abs() < 15.0, "straight is {}", straight);

    let hubs = pick_super_hubs(&sites, 4);
    let index = RTreeIndex::build(&sites);
    let tier = Tier::CoreBackbone;
    let (min_km, max_km) = tier.range_km();
    let pairs = sample_pairs(&sites, &index, min_km, max_km, 1, tier.forbid_same_city(), 42);
    assert_eq!(pairs.len(), 1);

    let mut caps = CapState::new(tier);
    let mut rng = StdRng::seed_from_u64(tier.seed(42));
    let mut accepted = 0;
    for (i, j) in pairs {
        assert!(tier.allows(sites[i].network, sites[j].network));
        assert!(caps.admits(&sites, i, j));
        let routed = routed_geometry(tier, &sites[i], &sites[j], &sites, &hubs, &mut rng)
            .expect("5000 km pair must pass the [600, 6000] band");
        caps.bump(&sites, i, j);
        accepted += 1;
        assert!(
            routed.distance_km >= 5000.0 - 15.0 && routed.distance_km <= 6250.0,
            "routed {} outside [5000, 6250]",
            routed.distance_km
        );
    }
    assert_eq!(accepted, 1);
}

#[test]
fn isolated_site_gains_minimum_degree_through_healing() {
    // a city with three sites, no links at all after synthesis
    let sites = vec![
        raw_site(1, "France", "Paris", 48.85, 2.35, Category::AccessNetwork),
        raw_site(2, "France", "Paris", 48.95, 2.40, Category::AccessNetwork),
        raw_site(3, "France", "Paris", 49.05, 2.45, Category::CoreBackbone),
    ];
    let hubs = pick_super_hubs(&sites, 4);
    let healed = heal_low_degree(&sites, &[], &hubs, 42, "t");
    assert!(!healed.is_empty());
    let adj = build_adjacency(&sites, &healed);
    for (i, s) in sites.iter().enumerate() {
        let min = if s.network.is_privileged() { 2 } else { 1 };
        assert!(
            adj[i].len() >= min,
            "{} has degree {}, needs {}",
            s.site_id,
            adj[i].len(),
            min
        );
    }
}

#[test]
fn topology_round_trips_through_json_files() {
    let topo = generate_from(MINI_WORLD, &mini_config()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let sites_path = dir.path().join("sites.json");
    let links_path = dir.path().join("links.json");
    std::fs::write(&sites_path, serde_json::to_vec_pretty(&topo.sites).unwrap()).unwrap();
    std::fs::write(&links_path, serde_json::to_vec_pretty(&topo.links).unwrap()).unwrap();

    let sites: Vec<Site> =
        serde_json::from_slice(&std::fs::read(&sites_path).unwrap()).unwrap();
    let links: Vec<topoforge::model::Link> =
        serde_json::from_slice(&std::fs::read(&links_path).unwrap()).unwrap();
    assert_eq!(sites, topo.sites);
    assert_eq!(links, topo.links);
}

#[test]
fn disjoint_clusters_merge_into_one_component() {
    // Paris and Lyon clusters, internally wired, no inter-cluster links;
    // bridge distance ~390 km falls in the Regional band
    let mut sites = Vec::new();
    for k in 0..3 {
        sites.push(raw_site(
            k + 1,
            "France",
            "Paris",
            48.85 + k as f64 * 0.05,
            2.35,
            Category::RegionalNetwork,
        ));
    }
    for k in 0..3 {
        sites.push(raw_site(
            k + 4,
            "France",
            "Lyon",
            45.76 + k as f64 * 0.05,
            4.83,
            Category::RegionalNetwork,
        ));
    }
    let hubs = pick_super_hubs(&sites, 4);
    let mut links = Vec::new();
    for (i, j) in [(0usize, 1usize), (1, 2), (3, 4), (4, 5)] {
        links.push(topoforge::model::Link {
            link_id: format!("LINK_{:06}", i + 1),
            site_a_id: sites[i].site_id.clone(),
            site_b_id: sites[j].site_id.clone(),
            link_type: Tier::MetroNetwork,
            link_distance: 6.0,
            link_wkt: "LINESTRING(2.35 48.85, 2.35 48.9)".to_string(),
            last_modified_at: "t".to_string(),
            is_deleted: false,
        });
    }
    let pre = connected_components(&build_adjacency(&sites, &links)).len();
    assert_eq!(pre, 2);
    let bridges = connect_components(&sites, &links, &hubs, 42, "t");
    assert_eq!(bridges.len(), 1);
    assert_eq!(bridges[0].link_type, Tier::RegionalNetwork);
    links.extend(bridges);
    let post = connected_components(&build_adjacency(&sites, &links)).len();
    assert_eq!(post, 1);
}
