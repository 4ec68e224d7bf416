//! Site and link records plus the network-role category set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network role a site plays in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Core Backbone")]
    CoreBackbone,
    #[serde(rename = "Regional Network")]
    RegionalNetwork,
    #[serde(rename = "Metro Network")]
    MetroNetwork,
    #[serde(rename = "Access Network")]
    AccessNetwork,
    #[serde(rename = "Data Center")]
    DataCenter,
    #[serde(rename = "International Gateway")]
    InternationalGateway,
    #[serde(rename = "Enterprise")]
    Enterprise,
    #[serde(rename = "IXP/Peering")]
    IxpPeering,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::CoreBackbone,
        Category::RegionalNetwork,
        Category::MetroNetwork,
        Category::AccessNetwork,
        Category::DataCenter,
        Category::InternationalGateway,
        Category::Enterprise,
        Category::IxpPeering,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::CoreBackbone => "Core Backbone",
            Category::RegionalNetwork => "Regional Network",
            Category::MetroNetwork => "Metro Network",
            Category::AccessNetwork => "Access Network",
            Category::DataCenter => "Data Center",
            Category::InternationalGateway => "International Gateway",
            Category::Enterprise => "Enterprise",
            Category::IxpPeering => "IXP/Peering",
        }
    }

    /// Roles that must reach the higher minimum degree during healing and
    /// are preferred as component representatives.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Category::CoreBackbone
                | Category::RegionalNetwork
                | Category::MetroNetwork
                | Category::DataCenter
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A facility site (graph node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub site_id: String,
    pub site_name: String,
    pub country: String,
    pub city: String,
    pub platform: String,
    pub network: Category,
    pub latitude: f64,
    pub longitude: f64,
    pub last_modified_at: String,
    pub is_deleted: bool,
}

impl Site {
    pub fn coord(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// A link (graph edge) between two distinct sites. Undirected, stored as an
/// ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub link_id: String,
    pub site_a_id: String,
    pub site_b_id: String,
    pub link_type: crate::tier::Tier,
    /// Length along the routed path, km. Always >= straight-line distance.
    pub link_distance: f64,
    pub link_wkt: String,
    pub last_modified_at: String,
    pub is_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip_serde() {
        for cat in Category::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.label()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cat);
        }
    }

    #[test]
    fn test_privileged_subset() {
        assert!(Category::CoreBackbone.is_privileged());
        assert!(Category::DataCenter.is_privileged());
        assert!(!Category::Enterprise.is_privileged());
        assert!(!Category::IxpPeering.is_privileged());
    }
}
