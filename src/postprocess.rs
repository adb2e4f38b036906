//! Caller-side finishing passes for a generated elevation grid.

use crate::config::GeneratorConfig;
use crate::tilemap::Tilemap;

/// Rescale every cell from the grid's [min, max] into [0, 1]. A flat grid
/// becomes all zero.
pub fn normalize(heights: &mut Tilemap<f32>) {
    let (min_h, max_h) = heights.min_max();
    let range = max_h - min_h;
    if range < 1e-6 {
        heights.fill(0.0);
        return;
    }
    for (_, _, h) in heights.iter_mut() {
        *h = (*h - min_h) / range;
    }
}

/// Average each cell with its 4 neighbours, sweeping the grid in place
/// row by row. Later cells see the already smoothed values of earlier ones.
pub fn smooth(heights: &mut Tilemap<f32>, passes: usize) {
    for _ in 0..passes {
        for y in 0..heights.height {
            for x in 0..heights.width {
                let mut sum = *heights.get(x, y);
                let neighbors = heights.neighbors(x, y);
                for &(nx, ny) in &neighbors {
                    sum += *heights.get(nx, ny);
                }
                heights.set(x, y, sum / (neighbors.len() + 1) as f32);
            }
        }
    }
}

/// Apply the passes `cfg` asks for: normalize, then smooth.
pub fn apply(heights: &mut Tilemap<f32>, cfg: &GeneratorConfig) {
    if cfg.normalize {
        normalize(heights);
    }
    smooth(heights, cfg.smooth_passes);
}
