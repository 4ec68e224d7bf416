//! Topology tiers and their admission parameters.
//!
//! Each tier owns a distance band, an edge budget, anti-starburst caps and
//! routing-waypoint density. The tables follow observed proportions of real
//! multi-tier backbones: few long international links, many short access
//! links.

use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Bearing bucket width for sector caps, degrees.
pub const SECTOR_DEG: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "Core Backbone")]
    CoreBackbone,
    #[serde(rename = "Regional Network")]
    RegionalNetwork,
    #[serde(rename = "Metro Network")]
    MetroNetwork,
    #[serde(rename = "Access Network")]
    AccessNetwork,
    #[serde(rename = "Data Center Interconnect")]
    DataCenterInterconnect,
    #[serde(rename = "International Gateway")]
    InternationalGateway,
    #[serde(rename = "INTERCONNECT")]
    Interconnect,
    #[serde(rename = "PATCH")]
    Patch,
}

impl Tier {
    /// Synthesis order. Fixed so results concatenate deterministically.
    pub const ALL: [Tier; 8] = [
        Tier::CoreBackbone,
        Tier::InternationalGateway,
        Tier::RegionalNetwork,
        Tier::MetroNetwork,
        Tier::AccessNetwork,
        Tier::DataCenterInterconnect,
        Tier::Interconnect,
        Tier::Patch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::CoreBackbone => "Core Backbone",
            Tier::RegionalNetwork => "Regional Network",
            Tier::MetroNetwork => "Metro Network",
            Tier::AccessNetwork => "Access Network",
            Tier::DataCenterInterconnect => "Data Center Interconnect",
            Tier::InternationalGateway => "International Gateway",
            Tier::Interconnect => "INTERCONNECT",
            Tier::Patch => "PATCH",
        }
    }

    /// Straight-line admission band [min, max] in km. The routed path may
    /// run up to max * 1.25, the straight line up to max * 1.5.
    pub fn range_km(&self) -> (f64, f64) {
        match self {
            Tier::CoreBackbone => (600.0, 6000.0),
            Tier::RegionalNetwork => (80.0, 1200.0),
            Tier::MetroNetwork => (8.0, 80.0),
            Tier::AccessNetwork => (1.0, 12.0),
            Tier::DataCenterInterconnect => (1.0, 6.0),
            Tier::InternationalGateway => (800.0, 9000.0),
            Tier::Interconnect => (200.0, 3000.0),
            Tier::Patch => (0.1, 2.0),
        }
    }

    pub fn budget(&self) -> usize {
        match self {
            Tier::CoreBackbone => 1500,
            Tier::RegionalNetwork => 1800,
            Tier::MetroNetwork => 2600,
            Tier::AccessNetwork => 2800,
            Tier::DataCenterInterconnect => 400,
            Tier::InternationalGateway => 200,
            Tier::Interconnect => 100,
            Tier::Patch => 200,
        }
    }

    /// Per-site degree cap within this tier.
    pub fn degree_cap(&self) -> usize {
        match self {
            Tier::CoreBackbone => 10,
            Tier::RegionalNetwork => 10,
            Tier::MetroNetwork => 16,
            Tier::AccessNetwork => 24,
            Tier::DataCenterInterconnect => 12,
            Tier::InternationalGateway => 4,
            Tier::Interconnect => 6,
            Tier::Patch => 60,
        }
    }

    /// Cap on parallel links per unordered city pair, if any.
    pub fn pair_cap(&self) -> Option<usize> {
        match self {
            Tier::CoreBackbone => Some(3),
            Tier::RegionalNetwork => Some(4),
            Tier::MetroNetwork => Some(6),
            Tier::InternationalGateway => Some(2),
            Tier::Interconnect => Some(3),
            _ => None,
        }
    }

    /// Cap per site per 30-degree bearing sector, if any.
    pub fn sector_cap(&self) -> Option<usize> {
        match self {
            Tier::CoreBackbone => Some(2),
            Tier::RegionalNetwork => Some(3),
            Tier::MetroNetwork => Some(4),
            Tier::InternationalGateway => Some(2),
            Tier::Interconnect => Some(2),
            _ => None,
        }
    }

    /// [min, max] count of routing waypoints inserted between endpoints.
    pub fn waypoint_range(&self) -> (usize, usize) {
        match self {
            Tier::AccessNetwork | Tier::DataCenterInterconnect | Tier::Patch => (0, 1),
            Tier::MetroNetwork => (1, 1),
            Tier::RegionalNetwork => (2, 3),
            Tier::CoreBackbone => (2, 4),
            Tier::Interconnect => (1, 3),
            Tier::InternationalGateway => (3, 5),
        }
    }

    /// (points per segment, jitter km) for path interpolation.
    pub fn segment_density(&self) -> (usize, f64) {
        match self {
            Tier::CoreBackbone | Tier::InternationalGateway | Tier::Interconnect => (6, 2.2),
            Tier::RegionalNetwork => (4, 1.6),
            Tier::MetroNetwork | Tier::AccessNetwork => (2, 0.6),
            Tier::DataCenterInterconnect => (1, 0.3),
            Tier::Patch => (2, 1.0),
        }
    }

    /// Long-haul tiers route through coastal gateway anchors.
    pub fn uses_coastal_gateways(&self) -> bool {
        matches!(
            self,
            Tier::CoreBackbone | Tier::InternationalGateway | Tier::Interconnect
        )
    }

    pub fn forbid_same_city(&self) -> bool {
        matches!(
            self,
            Tier::CoreBackbone
                | Tier::RegionalNetwork
                | Tier::InternationalGateway
                | Tier::Interconnect
        )
    }

    /// Category compatibility: at least one endpoint must carry a role the
    /// tier terminates on.
    pub fn allows(&self, a: Category, b: Category) -> bool {
        let either = |c: Category| a == c || b == c;
        match self {
            Tier::CoreBackbone => {
                either(Category::CoreBackbone) || either(Category::RegionalNetwork)
            }
            Tier::RegionalNetwork => {
                either(Category::RegionalNetwork)
                    || either(Category::MetroNetwork)
                    || either(Category::CoreBackbone)
            }
            Tier::MetroNetwork => {
                either(Category::MetroNetwork)
                    || either(Category::AccessNetwork)
                    || either(Category::DataCenter)
            }
            Tier::AccessNetwork => {
                either(Category::AccessNetwork) || either(Category::MetroNetwork)
            }
            Tier::DataCenterInterconnect => either(Category::DataCenter),
            Tier::InternationalGateway => {
                either(Category::InternationalGateway) || either(Category::CoreBackbone)
            }
            Tier::Interconnect => {
                either(Category::IxpPeering)
                    || either(Category::CoreBackbone)
                    || either(Category::RegionalNetwork)
            }
            Tier::Patch => true,
        }
    }

    /// Derive this tier's RNG seed from the global one. xxh3 keeps the
    /// derivation stable across runs and platforms.
    pub fn seed(&self, global_seed: u64) -> u64 {
        global_seed ^ xxh3_64(self.label().as_bytes())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_serde() {
        for tier in Tier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.label()));
            let back: Tier = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tier);
        }
    }

    #[test]
    fn test_bands_are_well_formed() {
        for tier in Tier::ALL {
            let (min, max) = tier.range_km();
            assert!(min > 0.0 && max > min, "{} band degenerate", tier);
        }
    }

    #[test]
    fn test_core_policy() {
        assert!(Tier::CoreBackbone.allows(Category::CoreBackbone, Category::Enterprise));
        assert!(Tier::CoreBackbone.allows(Category::Enterprise, Category::RegionalNetwork));
        assert!(!Tier::CoreBackbone.allows(Category::Enterprise, Category::AccessNetwork));
        assert!(Tier::Patch.allows(Category::Enterprise, Category::Enterprise));
        assert!(!Tier::DataCenterInterconnect.allows(Category::MetroNetwork, Category::IxpPeering));
    }

    #[test]
    fn test_tier_seeds_distinct_and_stable() {
        let a = Tier::CoreBackbone.seed(42);
        let b = Tier::MetroNetwork.seed(42);
        assert_ne!(a, b);
        assert_eq!(a, Tier::CoreBackbone.seed(42));
    }
}
