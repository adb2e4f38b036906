//! Error types for configuration, shape synthesis and elevation fill.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Rect;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("map size {0} must be a power of two and at least {min}", min = crate::config::MIN_MAP_SIZE)]
    InvalidMapSize(usize),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a region fails to produce a base polygon. Non-fatal: the region
/// is dropped.
#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    #[error("region {region:?} is too small to host a shape")]
    RegionTooSmall { region: Rect },

    #[error("no collision-free bearing from node {node}")]
    NoFreeBearing { node: usize },

    #[error("walk did not close within {0} nodes")]
    DidNotClose(usize),

    #[error("base polygon intersects itself")]
    SelfIntersecting,

    #[error("footprint {0:?} collides with another shape or leaves the map")]
    NoPlacement(Rect),
}

/// Reasons the elevation fill gives up on a contour.
#[derive(Debug, Error, PartialEq)]
pub enum FillError {
    #[error("fill leaked out of the contour on all {attempts} attempts")]
    Leaked { attempts: usize },

    #[error("contour too thin to hold a fill seed")]
    SeedOnCoast,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
