//! Landmass generation library
//!
//! Grows organic landmasses on a square map and fills them with elevation.
//! [`generate`] runs the whole pipeline; the modules are public for tools
//! that want individual stages.

pub mod config;
pub mod density;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod postprocess;
pub mod sampler;
pub mod seeds;
pub mod shaper;
pub mod tilemap;

pub use config::{GenerationMode, GeneratorConfig, NoiseParams, ShapeParams};
pub use error::{ConfigError, FillError, GenerationError, SynthesisError};
pub use generator::{generate, generate_with, GeneratedMap, RunSummary};
pub use tilemap::Tilemap;
