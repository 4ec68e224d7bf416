//! Static world data: anchor cities, role flags, regions and platform
//! weight tables.
//!
//! This is a curated list of ~80 metro areas rather than a fetched
//! gazetteer: synthesis must be deterministic and self-contained, and the
//! set of cities an ISP backbone plausibly touches changes rarely.

use crate::model::Category;

/// (country, city, latitude, longitude)
pub type Location = (&'static str, &'static str, f64, f64);

/// High-density cities: get an elevated site count per city.
pub const HOT_CITIES: &[&str] = &["London", "New York", "Tokyo", "Delhi", "São Paulo"];

/// Interconnection-heavy cities: drive hub-weighted category assignment and
/// super-hub selection.
pub const HUB_CITIES: &[&str] = &[
    "London",
    "Amsterdam",
    "Frankfurt",
    "Paris",
    "Zurich",
    "New York",
    "Chicago",
    "San Francisco",
    "Singapore",
    "Tokyo",
    "Seoul",
    "Dubai",
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hong Kong",
    "Madrid",
    "Milan",
];

/// Submarine-cable landing anchors preferred as long-haul waypoints.
pub const COASTAL_GATEWAYS: &[&str] = &[
    "Mumbai",
    "Chennai",
    "Kochi",
    "Singapore",
    "Hong Kong",
    "Tokyo",
    "Osaka",
    "Los Angeles",
    "San Francisco",
    "New York",
    "Miami",
    "Lisbon",
    "Barcelona",
    "Marseille",
    "Athens",
    "Istanbul",
    "Dubai",
];

/// Coarse country -> region buckets for the hub hierarchy.
const REGIONS: &[(&str, &[&str])] = &[
    (
        "Europe",
        &[
            "United Kingdom",
            "France",
            "Germany",
            "Netherlands",
            "Italy",
            "Spain",
            "Sweden",
            "Poland",
            "Switzerland",
            "Belgium",
            "Norway",
            "Denmark",
            "Austria",
            "Ireland",
            "Portugal",
            "Czech Republic",
            "Finland",
            "Greece",
            "Hungary",
        ],
    ),
    ("North America", &["United States", "Canada", "Mexico"]),
    (
        "Latin America",
        &["Brazil", "Argentina", "Chile", "Colombia", "Peru"],
    ),
    (
        "APAC",
        &[
            "India",
            "Japan",
            "China",
            "South Korea",
            "Singapore",
            "Malaysia",
            "Thailand",
            "Philippines",
            "Indonesia",
            "Australia",
            "New Zealand",
            "Vietnam",
            "Taiwan",
            "Hong Kong",
        ],
    ),
    (
        "MENA",
        &["UAE", "Saudi Arabia", "Qatar", "Israel", "Turkey", "Iran", "Oman"],
    ),
    (
        "Africa",
        &[
            "South Africa",
            "Egypt",
            "Kenya",
            "Nigeria",
            "Morocco",
            "Ethiopia",
            "Ghana",
            "Tanzania",
            "Uganda",
        ],
    ),
];

pub const DEFAULT_SITES_PER_CITY: usize = 30;
pub const HOT_CITY_MULTIPLIER: usize = 80;
/// Site coordinates are jittered off the city anchor by a uniform radius in
/// this km range.
pub const SITE_JITTER_KM: (f64, f64) = (2.0, 30.0);

pub fn is_hot(city: &str) -> bool {
    HOT_CITIES.contains(&city)
}

pub fn is_hub(city: &str) -> bool {
    HUB_CITIES.contains(&city)
}

pub fn region_of(country: &str) -> &'static str {
    for &(name, countries) in REGIONS {
        if countries.contains(&country) {
            return name;
        }
    }
    "Other"
}

/// Device platform labels.
pub const PLATFORMS: &[&str] = &[
    "Cisco ASR9000",
    "Cisco ASR1000",
    "Cisco NCS5500",
    "Cisco 8000",
    "Juniper MX480",
    "Juniper MX960",
    "Juniper MX2020",
    "Juniper ACX7100",
    "Nokia 7750-SR",
    "Nokia 7250-IXR",
    "Nokia 7210-SAS",
    "Huawei NE8000",
    "Huawei NE5000E",
    "Huawei NE40E",
    "Arista 7280R",
    "Arista 7500R",
    "HPE FlexNetwork",
];

/// Platform preference by city role; indices match [`PLATFORMS`].
pub const PLATFORM_WEIGHTS_HUB: &[f64] = &[
    1.0, 0.5, 1.0, 1.0, 0.9, 1.0, 0.8, 0.4, 0.9, 0.7, 0.4, 0.8, 0.7, 0.5, 0.7, 0.6, 0.3,
];
pub const PLATFORM_WEIGHTS_HOT: &[f64] = &[
    0.8, 0.7, 0.7, 0.6, 0.8, 0.7, 0.5, 0.6, 0.7, 0.6, 0.6, 0.6, 0.5, 0.6, 0.6, 0.5, 0.4,
];
pub const PLATFORM_WEIGHTS_NORMAL: &[f64] = &[
    0.3, 0.7, 0.3, 0.2, 0.5, 0.3, 0.2, 0.7, 0.5, 0.6, 0.7, 0.4, 0.3, 0.6, 0.4, 0.3, 0.6,
];

/// Category mix by city role. Each table sums to 1.0.
pub const CATEGORY_WEIGHTS_HUB: &[(Category, f64)] = &[
    (Category::CoreBackbone, 0.28),
    (Category::DataCenter, 0.20),
    (Category::IxpPeering, 0.18),
    (Category::InternationalGateway, 0.12),
    (Category::RegionalNetwork, 0.10),
    (Category::MetroNetwork, 0.09),
    (Category::AccessNetwork, 0.02),
    (Category::Enterprise, 0.01),
];
pub const CATEGORY_WEIGHTS_HOT: &[(Category, f64)] = &[
    (Category::CoreBackbone, 0.18),
    (Category::RegionalNetwork, 0.20),
    (Category::MetroNetwork, 0.32),
    (Category::DataCenter, 0.12),
    (Category::AccessNetwork, 0.10),
    (Category::IxpPeering, 0.04),
    (Category::Enterprise, 0.03),
    (Category::InternationalGateway, 0.01),
];
pub const CATEGORY_WEIGHTS_NORMAL: &[(Category, f64)] = &[
    (Category::MetroNetwork, 0.40),
    (Category::AccessNetwork, 0.28),
    (Category::RegionalNetwork, 0.18),
    (Category::Enterprise, 0.08),
    (Category::DataCenter, 0.03),
    (Category::IxpPeering, 0.02),
    (Category::CoreBackbone, 0.01),
    (Category::InternationalGateway, 0.00),
];

/// Anchor locations the placement phase scatters sites around.
pub const LOCATIONS: &[Location] = &[
    // Europe
    ("United Kingdom", "London", 51.5074, -0.1278),
    ("United Kingdom", "Manchester", 53.4808, -2.2426),
    ("France", "Paris", 48.8566, 2.3522),
    ("France", "Lyon", 45.7640, 4.8357),
    ("Germany", "Berlin", 52.5200, 13.4050),
    ("Germany", "Munich", 48.1351, 11.5820),
    ("Germany", "Frankfurt", 50.1109, 8.6821),
    ("Netherlands", "Amsterdam", 52.3676, 4.9041),
    ("Italy", "Rome", 41.9028, 12.4964),
    ("Italy", "Milan", 45.4642, 9.1900),
    ("Spain", "Madrid", 40.4168, -3.7038),
    ("Spain", "Barcelona", 41.3851, 2.1734),
    ("Sweden", "Stockholm", 59.3293, 18.0686),
    ("Poland", "Warsaw", 52.2297, 21.0122),
    ("Switzerland", "Zurich", 47.3769, 8.5417),
    ("Belgium", "Brussels", 50.8503, 4.3517),
    ("Norway", "Oslo", 59.9139, 10.7522),
    ("Denmark", "Copenhagen", 55.6761, 12.5683),
    ("Austria", "Vienna", 48.2082, 16.3738),
    ("Ireland", "Dublin", 53.3498, -6.2603),
    ("Portugal", "Lisbon", 38.7223, -9.1393),
    ("Czech Republic", "Prague", 50.0755, 14.4378),
    ("Finland", "Helsinki", 60.1699, 24.9384),
    ("Greece", "Athens", 37.9838, 23.7275),
    ("Hungary", "Budapest", 47.4979, 19.0402),
    // North America
    ("United States", "New York", 40.7128, -74.0060),
    ("United States", "Chicago", 41.8781, -87.6298),
    ("United States", "San Francisco", 37.7749, -122.4194),
    ("United States", "Dallas", 32.7767, -96.7970),
    ("United States", "Los Angeles", 34.0522, -118.2437),
    ("United States", "Seattle", 47.6062, -122.3321),
    ("United States", "Atlanta", 33.7490, -84.3880),
    ("Canada", "Toronto", 43.6532, -79.3832),
    ("Canada", "Vancouver", 49.2827, -123.1207),
    ("Canada", "Montreal", 45.5017, -73.5673),
    ("Mexico", "Mexico City", 19.4326, -99.1332),
    ("Mexico", "Guadalajara", 20.6597, -103.3496),
    // Latin America
    ("Brazil", "São Paulo", -23.5505, -46.6333),
    ("Brazil", "Rio de Janeiro", -22.9068, -43.1729),
    ("Argentina", "Buenos Aires", -34.6037, -58.3816),
    ("Chile", "Santiago", -33.4489, -70.6693),
    ("Colombia", "Bogotá", 4.7110, -74.0721),
    ("Peru", "Lima", -12.0464, -77.0428),
    // APAC
    ("India", "Delhi", 28.7041, 77.1025),
    ("India", "Mumbai", 19.0760, 72.8777),
    ("India", "Bangalore", 12.9716, 77.5946),
    ("India", "Chennai", 13.0827, 80.2707),
    ("Japan", "Tokyo", 35.6895, 139.6917),
    ("Japan", "Osaka", 34.6937, 135.5023),
    ("China", "Beijing", 39.9042, 116.4074),
    ("China", "Shanghai", 31.2304, 121.4737),
    ("South Korea", "Seoul", 37.5665, 126.9780),
    ("Singapore", "Singapore", 1.3521, 103.8198),
    ("Malaysia", "Kuala Lumpur", 3.1390, 101.6869),
    ("Thailand", "Bangkok", 13.7563, 100.5018),
    ("Philippines", "Manila", 14.5995, 120.9842),
    ("Indonesia", "Jakarta", -6.2088, 106.8456),
    ("Australia", "Sydney", -33.8688, 151.2093),
    ("Australia", "Melbourne", -37.8136, 144.9631),
    ("New Zealand", "Auckland", -36.8485, 174.7633),
    ("Vietnam", "Ho Chi Minh City", 10.8231, 106.6297),
    ("Taiwan", "Taipei", 25.0330, 121.5654),
    ("Hong Kong", "Hong Kong", 22.3193, 114.1694),
    // MENA
    ("UAE", "Dubai", 25.2048, 55.2708),
    ("UAE", "Abu Dhabi", 24.4539, 54.3773),
    ("Saudi Arabia", "Riyadh", 24.7136, 46.6753),
    ("Qatar", "Doha", 25.2854, 51.5310),
    ("Israel", "Tel Aviv", 32.0853, 34.7818),
    ("Turkey", "Istanbul", 41.0082, 28.9784),
    ("Iran", "Tehran", 35.6892, 51.3890),
    ("Oman", "Muscat", 23.5859, 58.4059),
    // Africa
    ("South Africa", "Johannesburg", -26.2041, 28.0473),
    ("South Africa", "Cape Town", -33.9249, 18.4241),
    ("Egypt", "Cairo", 30.0444, 31.2357),
    ("Kenya", "Nairobi", -1.2921, 36.8219),
    ("Nigeria", "Lagos", 6.5244, 3.3792),
    ("Morocco", "Casablanca", 33.5731, -7.5898),
    ("Ethiopia", "Addis Ababa", 9.1450, 38.7451),
    ("Ghana", "Accra", 5.6037, -0.1870),
    ("Tanzania", "Dar es Salaam", -6.7924, 39.2083),
    ("Uganda", "Kampala", 0.3476, 32.5825),
];
