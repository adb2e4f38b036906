//! Generator configuration
//!
//! `GeneratorConfig` holds the options a caller may change between runs;
//! `ShapeParams` holds the fixed constants of the shaping pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted map side.
pub const MIN_MAP_SIZE: usize = 128;

/// How the elevation grid is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Organic landmasses grown inside placement regions
    #[default]
    Shaped,
    /// Plain multi-octave noise over the whole map
    Noise,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shaped => write!(f, "shaped"),
            Self::Noise => write!(f, "noise"),
        }
    }
}

/// Multi-octave noise settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Cells per noise unit at the first octave
    pub scale: f32,
    pub octaves: usize,
    /// Amplitude multiplier between octaves
    pub persistence: f32,
    /// Frequency multiplier between octaves
    pub lacunarity: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 40.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Runtime options for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed text; empty means a random seed
    pub seed: String,
    /// Side of the square map, a power of two
    pub map_size: usize,
    pub mode: GenerationMode,
    /// Requested number of landmasses
    pub shape_count: usize,
    /// Target share of the placement grid covered by land (0-1)
    pub coverage: f32,
    /// Radius of the density field's land pressure
    pub density_radius: usize,
    /// Largest distance a coastline may stray from its base polygon
    pub contour_distance: usize,
    /// Fill error band inside which the walk stops steering toward its target
    pub fill_threshold: f32,
    pub noise: NoiseParams,
    /// Rescale the composite into [0, 1] before smoothing
    pub normalize: bool,
    pub smooth_passes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            map_size: 512,
            mode: GenerationMode::Shaped,
            shape_count: 4,
            coverage: 0.5,
            density_radius: 4,
            contour_distance: 8,
            fill_threshold: 0.1,
            noise: NoiseParams::default(),
            normalize: true,
            smooth_passes: 3,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.map_size.is_power_of_two() || self.map_size < MIN_MAP_SIZE {
            return Err(ConfigError::InvalidMapSize(self.map_size));
        }
        Ok(())
    }

    /// Copy with out-of-range numbers clamped to usable values.
    pub fn sanitized(&self) -> Self {
        let mut cfg = self.clone();
        cfg.coverage = if cfg.coverage.is_finite() {
            cfg.coverage.clamp(0.0, 1.0)
        } else {
            GeneratorConfig::default().coverage
        };
        cfg.fill_threshold = cfg.fill_threshold.clamp(0.0, 1.0);
        cfg.density_radius = cfg.density_radius.clamp(1, (cfg.map_size / 8).max(1));
        cfg.contour_distance = cfg.contour_distance.max(2);
        cfg.smooth_passes = cfg.smooth_passes.min(16);
        cfg.noise.octaves = cfg.noise.octaves.clamp(1, 16);
        if cfg.noise.scale.is_nan() || cfg.noise.scale <= 0.0 {
            cfg.noise.scale = NoiseParams::default().scale;
        }
        cfg
    }
}

/// Fixed constants of the shaping pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeParams {
    // =========================================================================
    // Walk
    // =========================================================================
    /// Fill fraction reached at coverage 0
    pub min_fill: f32,
    /// Fill fraction reached at coverage 1
    pub max_fill: f32,
    /// Largest rotation applied to a finished polygon, in degrees
    pub max_rotation: f32,
    /// Share of each axis removed when deriving the limiter band, in percent
    pub inner_shrink_percent: f32,
    /// Width of the bearing scan centred on the side's base bearing
    pub scan_window: f32,
    pub scan_step: f32,
    /// Preferred largest turn between consecutive segments
    pub max_turn: f32,
    /// Random jitter on the bearing home while closing
    pub closing_jitter: f32,
    pub step_length: i32,
    /// Manhattan distance to the start node at which the walk closes
    pub close_steps: i32,
    pub max_walk_nodes: usize,

    // =========================================================================
    // Contour and fill
    // =========================================================================
    pub max_contour_points: usize,
    /// Cells searched along the base polygon when tracking the nearest point
    pub cursor_search: usize,
    pub max_fill_visits: usize,
    pub fill_retries: usize,
    /// Elevation given to coast cells
    pub water_cutoff: f32,

    // =========================================================================
    // Partitioning and placement
    // =========================================================================
    /// Map margin kept free of regions
    pub grid_border: usize,
    pub min_region_size: usize,
    /// Largest width:height (or height:width) of a region
    pub max_side_ratio: f32,
    /// Slack kept between footprints when jittering placement
    pub placement_margin: i32,
    /// Noise-mode sample offset range, per axis
    pub noise_offset: i32,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            min_fill: 0.5,
            max_fill: 0.9,
            max_rotation: 30.0,
            inner_shrink_percent: 40.0,
            scan_window: 180.0,
            scan_step: 5.0,
            max_turn: 45.0,
            closing_jitter: 15.0,
            step_length: 4,
            close_steps: 16,
            max_walk_nodes: 10_000,

            max_contour_points: 100_000,
            cursor_search: 20,
            max_fill_visits: 5_000_000,
            fill_retries: 16,
            water_cutoff: 0.1,

            grid_border: 32,
            min_region_size: 64,
            max_side_ratio: 2.0,
            placement_margin: 4,
            noise_offset: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_map_sizes() {
        for size in [0, 64, 300, 511] {
            let cfg = GeneratorConfig {
                map_size: size,
                ..Default::default()
            };
            assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMapSize(s)) if s == size));
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = GeneratorConfig::from_json_str(
            r#"{ "seed": "test", "map_size": 256, "mode": "noise", "noise": { "octaves": 6 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, "test");
        assert_eq!(cfg.map_size, 256);
        assert_eq!(cfg.mode, GenerationMode::Noise);
        assert_eq!(cfg.noise.octaves, 6);
        assert_eq!(cfg.noise.scale, NoiseParams::default().scale);
        assert_eq!(cfg.shape_count, 4);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            GeneratorConfig::from_json_str("{ map_size: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_sanitize_clamps() {
        let cfg = GeneratorConfig {
            coverage: 3.0,
            density_radius: 0,
            contour_distance: 0,
            smooth_passes: 100,
            noise: NoiseParams {
                scale: -1.0,
                octaves: 0,
                ..Default::default()
            },
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.coverage, 1.0);
        assert_eq!(cfg.density_radius, 1);
        assert_eq!(cfg.contour_distance, 2);
        assert_eq!(cfg.smooth_passes, 16);
        assert_eq!(cfg.noise.octaves, 1);
        assert_eq!(cfg.noise.scale, 40.0);
    }

    #[test]
    fn test_sanitize_bounds_density_radius() {
        let cfg = GeneratorConfig {
            map_size: 256,
            density_radius: 50_000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.density_radius, 32);
        assert_eq!(GeneratorConfig::default().sanitized().density_radius, 4);
    }
}
