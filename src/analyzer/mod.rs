//! Commit graph analysis: distances and base tag selection

pub mod distance;
pub mod tag_resolver;

pub use distance::DistanceCalculator;
pub use tag_resolver::{LookupPolicy, TagResolver};
