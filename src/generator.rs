//! Generation pipeline
//!
//! Serial phase: partition the map, synthesize one base polygon per region
//! and jitter each into place. Everything here shares one generator and one
//! collision map, so it runs on the calling thread.
//!
//! Parallel phase: refine every coastline, then (after all coastlines are
//! done) fill every shape, one rayon task per shape. Per-shape randomness is
//! drawn before the fan-out, so output depends only on the seed. Coastline
//! stamps are merged back into the density field in shape order; the merged
//! field is returned with the map.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{GenerationMode, GeneratorConfig, ShapeParams};
use crate::density::DensityField;
use crate::error::GenerationError;
use crate::geometry::{Point, Rect};
use crate::sampler::NoiseSampler;
use crate::seeds::MapSeed;
use crate::shaper::{
    fill_elevation, footprint_halo, place, synthesize, CollisionMap, Refiner, RegionPartitioner,
    Shape,
};
use crate::tilemap::Tilemap;

/// Noise sample offsets for shape fills are drawn from `0..FILL_OFFSET_RANGE`.
const FILL_OFFSET_RANGE: i32 = 1024;

/// The raw composite and the shapes it was built from.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    /// Elevation in [0, 1], zero off land
    pub heights: Tilemap<f32>,
    /// Surviving shapes, in region order
    pub shapes: Vec<Shape>,
    pub seed: MapSeed,
    pub mode: GenerationMode,
    /// Regions dropped because synthesis failed
    pub dropped: usize,
    /// Shapes whose fill gave up (kept with an empty patch)
    pub failed_fills: usize,
    /// Land pressure after every coastline was stamped; `None` in noise mode
    pub density: Option<DensityField>,
}

impl GeneratedMap {
    pub fn map_size(&self) -> usize {
        self.heights.width
    }

    pub fn land_cells(&self) -> usize {
        self.heights.count_above(0.0)
    }

    /// Share of the map above zero elevation.
    pub fn land_fraction(&self) -> f32 {
        let area = (self.heights.width * self.heights.height).max(1);
        self.land_cells() as f32 / area as f32
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed.master,
            seed_from_text: self.seed.from_text,
            mode: self.mode,
            map_size: self.map_size(),
            shapes: self.shapes.iter().map(ShapeSummary::from).collect(),
            dropped: self.dropped,
            failed_fills: self.failed_fills,
            land_fraction: self.land_fraction(),
        }
    }
}

/// Serializable record of a run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub seed_from_text: bool,
    pub mode: GenerationMode,
    pub map_size: usize,
    pub shapes: Vec<ShapeSummary>,
    pub dropped: usize,
    pub failed_fills: usize,
    pub land_fraction: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShapeSummary {
    pub id: u32,
    pub rect: Rect,
    pub nodes: usize,
    pub contour_points: usize,
    pub contour_closed: bool,
    pub land_cells: usize,
    pub rotation: f32,
}

impl From<&Shape> for ShapeSummary {
    fn from(shape: &Shape) -> Self {
        Self {
            id: shape.id,
            rect: shape.rect,
            nodes: shape.nodes.len(),
            contour_points: shape.contour.len(),
            contour_closed: shape.contour_closed,
            land_cells: shape.land_cells(),
            rotation: shape.walk.rotation,
        }
    }
}

/// Per-shape inputs of the fill stage, drawn serially.
#[derive(Clone, Copy, Debug)]
struct FillJob {
    seed: u64,
    offset: Point,
}

/// Run the pipeline with the default shaping constants.
pub fn generate(cfg: &GeneratorConfig) -> Result<GeneratedMap, GenerationError> {
    generate_with(cfg, &ShapeParams::default())
}

pub fn generate_with(
    cfg: &GeneratorConfig,
    params: &ShapeParams,
) -> Result<GeneratedMap, GenerationError> {
    cfg.validate()?;
    let cfg = cfg.sanitized();
    let seed = MapSeed::from_text(&cfg.seed);
    if !seed.from_text {
        info!(seed = seed.master, "no seed text given, drew a random seed");
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed.shaping);
    let sampler = NoiseSampler::new(seed.noise, &cfg.noise);

    info!(
        size = cfg.map_size,
        mode = %cfg.mode,
        shapes = cfg.shape_count,
        coverage = cfg.coverage,
        "generating map"
    );

    let map = match cfg.mode {
        GenerationMode::Noise => GeneratedMap {
            heights: noise_map(&cfg, params, &sampler, &mut rng),
            shapes: Vec::new(),
            seed,
            mode: cfg.mode,
            dropped: 0,
            failed_fills: 0,
            density: None,
        },
        GenerationMode::Shaped => shaped_map(&cfg, params, &sampler, seed, &mut rng),
    };

    info!(
        shapes = map.shapes.len(),
        dropped = map.dropped,
        land = map.land_fraction(),
        "map complete"
    );
    Ok(map)
}

/// Terrain noise over the whole map at a random offset.
fn noise_map<R: Rng>(
    cfg: &GeneratorConfig,
    params: &ShapeParams,
    sampler: &NoiseSampler,
    rng: &mut R,
) -> Tilemap<f32> {
    let range = params.noise_offset.max(1);
    let ox = rng.gen_range(-range..range);
    let oy = rng.gen_range(-range..range);
    let mut heights = Tilemap::new(cfg.map_size, cfg.map_size);
    for (x, y, h) in heights.iter_mut() {
        *h = sampler.terrain(x as i32 + ox, y as i32 + oy);
    }
    heights
}

fn shaped_map<R: Rng>(
    cfg: &GeneratorConfig,
    params: &ShapeParams,
    sampler: &NoiseSampler,
    seed: MapSeed,
    rng: &mut R,
) -> GeneratedMap {
    let side = cfg.map_size;
    let halo = footprint_halo(cfg);
    let mut density = DensityField::new(side, cfg.density_radius);
    let mut collisions = CollisionMap::new(side);

    // Serial phase.
    let partitioner = RegionPartitioner::new(side, cfg.shape_count, cfg.coverage, params, rng);
    if partitioner.len() < cfg.shape_count {
        info!(
            requested = cfg.shape_count,
            regions = partitioner.len(),
            "shape count clamped to what the map can hold"
        );
    }

    let mut shapes = Vec::with_capacity(partitioner.len());
    let mut dropped = 0;
    for region in partitioner {
        match synthesize(&region, &collisions, cfg, params, rng) {
            Ok(shape) => {
                collisions.stamp(shape.footprint(halo), shape.id);
                shapes.push(shape);
            }
            Err(e) => {
                warn!(region = region.id, error = %e, "dropping region");
                dropped += 1;
            }
        }
    }

    for shape in &mut shapes {
        place(shape, &mut collisions, halo, params, rng);
    }

    let jobs: Vec<FillJob> = shapes
        .iter()
        .map(|shape| FillJob {
            seed: seed.for_shape(shape.id),
            offset: Point::new(
                rng.gen_range(0..FILL_OFFSET_RANGE),
                rng.gen_range(0..FILL_OFFSET_RANGE),
            ),
        })
        .collect();
    info!(shapes = shapes.len(), dropped, "serial phase complete");

    // Parallel phase: coastlines.
    let refiner = Refiner {
        sampler,
        params,
        deviation: cfg.contour_distance as i32,
        halo,
        map_side: side,
    };
    let stamps: Vec<Vec<Point>> = shapes
        .par_iter_mut()
        .map(|shape| {
            let mut view = density.view();
            refiner.refine(shape, &mut view);
            view.into_stamps()
        })
        .collect();
    for s in &stamps {
        density.absorb(s);
    }
    debug!(
        points = stamps.iter().map(Vec::len).sum::<usize>(),
        "coastlines merged into density field"
    );

    // Parallel phase: elevation.
    let failed_fills = shapes
        .par_iter_mut()
        .zip(jobs.par_iter())
        .map(|(shape, job)| {
            let mut shape_rng = ChaCha8Rng::seed_from_u64(job.seed);
            match fill_elevation(
                &shape.contour,
                shape.rect,
                sampler,
                job.offset,
                params,
                &mut shape_rng,
            ) {
                Ok(patch) => {
                    shape.patch = patch;
                    true
                }
                Err(e) => {
                    warn!(shape = shape.id, error = %e, "fill failed, shape left empty");
                    shape.patch = Tilemap::new(shape.rect.cols(), shape.rect.rows());
                    false
                }
            }
        })
        .filter(|filled| !filled)
        .count();

    let heights = composite(side, &shapes);
    GeneratedMap {
        heights,
        shapes,
        seed,
        mode: GenerationMode::Shaped,
        dropped,
        failed_fills,
        density: Some(density),
    }
}

/// Write every shape's patch into a fresh map at its box origin.
pub fn composite(side: usize, shapes: &[Shape]) -> Tilemap<f32> {
    let mut heights = Tilemap::new(side, side);
    for shape in shapes {
        heights.blit_nonzero(&shape.patch, shape.rect.start.x, shape.rect.start.y);
    }
    heights
}
