//! Profiling tool for the shaping stages

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use landmass_generator::config::{GeneratorConfig, ShapeParams};
use landmass_generator::density::DensityField;
use landmass_generator::geometry::Point;
use landmass_generator::sampler::NoiseSampler;
use landmass_generator::seeds::MapSeed;
use landmass_generator::shaper::{
    fill_elevation, footprint_halo, place, synthesize, CollisionMap, Refiner, RegionPartitioner,
};

fn main() {
    let cfg = GeneratorConfig {
        seed: "profile".to_string(),
        map_size: 1024,
        shape_count: 9,
        ..Default::default()
    };
    let params = ShapeParams::default();
    let seed = MapSeed::from_text(&cfg.seed);
    let side = cfg.map_size;
    let halo = footprint_halo(&cfg);

    println!("=== Shaping Profile ===");
    println!("Map size: {}x{} ({} cells)", side, side, side * side);
    println!("Shapes requested: {}", cfg.shape_count);
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(seed.shaping);
    let sampler = NoiseSampler::new(seed.noise, &cfg.noise);
    let mut density = DensityField::new(side, cfg.density_radius);
    let mut collisions = CollisionMap::new(side);

    // Partition and synthesis
    let start = Instant::now();
    let partitioner = RegionPartitioner::new(side, cfg.shape_count, cfg.coverage, &params, &mut rng);
    let mut shapes = Vec::new();
    let mut failures = 0;
    for region in partitioner {
        match synthesize(&region, &collisions, &cfg, &params, &mut rng) {
            Ok(shape) => {
                collisions.stamp(shape.footprint(halo), shape.id);
                shapes.push(shape);
            }
            Err(e) => {
                println!("  region {} dropped: {}", region.id, e);
                failures += 1;
            }
        }
    }
    let synth_time = start.elapsed();
    println!("Synthesis: {:?} ({} shapes, {} dropped)", synth_time, shapes.len(), failures);

    // Placement
    let start = Instant::now();
    for shape in &mut shapes {
        place(shape, &mut collisions, halo, &params, &mut rng);
    }
    let place_time = start.elapsed();
    println!("Placement: {:?}", place_time);

    // Coastlines, one at a time so each can be timed
    let refiner = Refiner {
        sampler: &sampler,
        params: &params,
        deviation: cfg.contour_distance as i32,
        halo,
        map_side: side,
    };
    let mut contour_time = Duration::ZERO;
    for shape in &mut shapes {
        let start = Instant::now();
        let mut view = density.view();
        refiner.refine(shape, &mut view);
        let stamps = view.into_stamps();
        density.absorb(&stamps);
        let elapsed = start.elapsed();
        contour_time += elapsed;
        println!(
            "  shape {:>2}: {:>6} coast points in {:?}",
            shape.id,
            shape.contour.len(),
            elapsed
        );
    }
    println!("Coastlines: {:?}", contour_time);

    // Fills
    let mut fill_time = Duration::ZERO;
    for shape in &mut shapes {
        let offset = Point::new(rng.gen_range(0..1024), rng.gen_range(0..1024));
        let mut shape_rng = ChaCha8Rng::seed_from_u64(seed.for_shape(shape.id));
        let start = Instant::now();
        match fill_elevation(&shape.contour, shape.rect, &sampler, offset, &params, &mut shape_rng) {
            Ok(patch) => shape.patch = patch,
            Err(e) => println!("  shape {} fill failed: {}", shape.id, e),
        }
        fill_time += start.elapsed();
    }
    println!("Fills: {:?}", fill_time);

    let total = synth_time + place_time + contour_time + fill_time;
    let share = |d: Duration| 100.0 * d.as_secs_f64() / total.as_secs_f64().max(1e-9);
    println!("\n=== Summary ===");
    println!("Synthesis:  {:>8.2}% ({:?})", share(synth_time), synth_time);
    println!("Placement:  {:>8.2}% ({:?})", share(place_time), place_time);
    println!("Coastlines: {:>8.2}% ({:?})", share(contour_time), contour_time);
    println!("Fills:      {:>8.2}% ({:?})", share(fill_time), fill_time);
    println!("─────────────────────────────────");
    println!("Total:      {:?}", total);
}
