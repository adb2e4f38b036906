//! Landmass shaping
//!
//! The serial half of the pipeline partitions the map into regions, grows a
//! base polygon in each and jitters the survivors into place against a
//! shared [`CollisionMap`]. The parallel half refines each polygon into a
//! coastline and fills it with elevation; by then every shape owns a
//! disjoint footprint.

pub mod collision;
pub mod contour;
pub mod fill;
pub mod limiter;
pub mod partition;
pub mod placement;
pub mod shape;
pub mod synth;

pub use collision::{CollisionMap, Slack};
pub use contour::Refiner;
pub use fill::fill_elevation;
pub use limiter::Limiter;
pub use partition::{Region, RegionPartitioner};
pub use placement::place;
pub use shape::{Shape, WalkStats};
pub use synth::{footprint_halo, synthesize};
