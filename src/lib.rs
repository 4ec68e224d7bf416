pub mod error;
pub mod geo;
pub mod hubs;
pub mod model;
pub mod path;
pub mod pipeline;
pub mod repair;
pub mod sites;
pub mod spatial;
pub mod synth;
pub mod tier;
pub mod world;

pub use error::TopoError;
pub use model::{Category, Link, Site};
pub use pipeline::{generate, GeneratorConfig, Topology};
pub use tier::Tier;
