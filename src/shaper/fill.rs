//! Elevation fill
//!
//! Rasterizes a coastline over its box and flood-fills the inside
//! breadth-first. Each cell's elevation combines terrain noise with how deep
//! it sits between the coasts on both axes, so land rises away from the
//! shore.

use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::config::ShapeParams;
use crate::error::FillError;
use crate::geometry::{Point, Rect};
use crate::sampler::NoiseSampler;
use crate::tilemap::Tilemap;

/// Smallest axis extent used when normalizing coast distances.
const MIN_EXTENT: u32 = 4;

/// Fill the inside of `contour` over `rect` and return the elevation patch.
///
/// Noise is sampled at local coordinates shifted by `offset`. If the fill
/// escapes to the raster edge the seed was outside the coast; the fill is
/// retried from random interior seeds up to `params.fill_retries` times.
pub fn fill_elevation<R: Rng>(
    contour: &[Point],
    rect: Rect,
    sampler: &NoiseSampler,
    offset: Point,
    params: &ShapeParams,
    rng: &mut R,
) -> Result<Tilemap<f32>, FillError> {
    let raster = CoastRaster::new(contour, rect);
    if !raster.has_interior() {
        return Err(FillError::SeedOnCoast);
    }

    let (w, h) = (raster.width(), raster.height());
    let mut seed = raster.enclosed_seed(Point::new(w / 2, h / 2));
    for attempt in 1..=params.fill_retries.max(1) {
        match raster.flood(seed, sampler, offset, params) {
            Some(mut patch) => {
                for (x, y, v) in patch.iter_mut() {
                    if raster.is_coast(x as i32, y as i32) {
                        *v = params.water_cutoff;
                    }
                }
                debug!(attempt, cells = patch.count_above(0.0), "filled contour");
                return Ok(patch);
            }
            None => {
                let (mx, my) = (w / 10, h / 10);
                seed = Point::new(
                    rng.gen_range(mx..(w - mx).max(mx + 1)),
                    rng.gen_range(my..(h - my).max(my + 1)),
                );
            }
        }
    }
    Err(FillError::Leaked {
        attempts: params.fill_retries.max(1),
    })
}

/// Coast cells of one shape in box-local coordinates, with the free run
/// lengths to the nearest coast (or edge) in each axis direction.
struct CoastRaster {
    coast: Tilemap<bool>,
    left: Tilemap<u32>,
    right: Tilemap<u32>,
    down: Tilemap<u32>,
    up: Tilemap<u32>,
}

impl CoastRaster {
    fn new(contour: &[Point], rect: Rect) -> Self {
        let (cols, rows) = (rect.cols(), rect.rows());
        let mut coast = Tilemap::new(cols, rows);
        for &p in contour {
            let local = rect.to_local(p);
            coast.try_set(local.x, local.y, true);
        }

        let mut left = Tilemap::new(cols, rows);
        let mut right = Tilemap::new(cols, rows);
        let mut down = Tilemap::new(cols, rows);
        let mut up = Tilemap::new(cols, rows);
        for y in 0..rows {
            for x in 1..cols {
                let run = if *coast.get(x - 1, y) { 0 } else { left.get(x - 1, y) + 1 };
                left.set(x, y, run);
            }
            for x in (0..cols.saturating_sub(1)).rev() {
                let run = if *coast.get(x + 1, y) { 0 } else { right.get(x + 1, y) + 1 };
                right.set(x, y, run);
            }
        }
        for x in 0..cols {
            for y in 1..rows {
                let run = if *coast.get(x, y - 1) { 0 } else { down.get(x, y - 1) + 1 };
                down.set(x, y, run);
            }
            for y in (0..rows.saturating_sub(1)).rev() {
                let run = if *coast.get(x, y + 1) { 0 } else { up.get(x, y + 1) + 1 };
                up.set(x, y, run);
            }
        }

        Self {
            coast,
            left,
            right,
            down,
            up,
        }
    }

    fn width(&self) -> i32 {
        self.coast.width as i32
    }

    fn height(&self) -> i32 {
        self.coast.height as i32
    }

    fn is_coast(&self, x: i32, y: i32) -> bool {
        self.coast.try_get(x, y).copied().unwrap_or(false)
    }

    fn on_edge(&self, p: Point) -> bool {
        p.x <= 0 || p.y <= 0 || p.x >= self.width() - 1 || p.y >= self.height() - 1
    }

    /// Some cell off the raster edge is not coast.
    fn has_interior(&self) -> bool {
        self.coast
            .iter()
            .any(|(x, y, &c)| !c && !self.on_edge(Point::new(x as i32, y as i32)))
    }

    /// Whether a coast cell lies on the ray from `p` in each direction
    /// (left, right, down, up).
    fn rays(&self, p: Point) -> [bool; 4] {
        let (x, y) = (p.x as usize, p.y as usize);
        [
            *self.left.get(x, y) < p.x as u32,
            *self.right.get(x, y) < (self.width() - 1 - p.x) as u32,
            *self.down.get(x, y) < p.y as u32,
            *self.up.get(x, y) < (self.height() - 1 - p.y) as u32,
        ]
    }

    /// Nudge `seed` across the coast when it is not enclosed on all four
    /// rays.
    fn enclosed_seed(&self, seed: Point) -> Point {
        let seed = Point::new(
            seed.x.clamp(1, (self.width() - 2).max(1)),
            seed.y.clamp(1, (self.height() - 2).max(1)),
        );
        if self.is_coast(seed.x, seed.y) {
            return seed;
        }
        let (x, y) = (seed.x as usize, seed.y as usize);
        let [l, r, d, u] = self.rays(seed);
        let moved = match (l, r, d, u) {
            (true, false, _, _) => Point::new(seed.x - *self.left.get(x, y) as i32 - 2, seed.y),
            (false, true, _, _) => Point::new(seed.x + *self.right.get(x, y) as i32 + 2, seed.y),
            (_, _, true, false) => Point::new(seed.x, seed.y - *self.down.get(x, y) as i32 - 2),
            (_, _, false, true) => Point::new(seed.x, seed.y + *self.up.get(x, y) as i32 + 2),
            _ => seed,
        };
        Point::new(
            moved.x.clamp(1, (self.width() - 2).max(1)),
            moved.y.clamp(1, (self.height() - 2).max(1)),
        )
    }

    /// Elevation at a free cell.
    fn elevation(&self, p: Point, sampler: &NoiseSampler, offset: Point, cutoff: f32) -> f32 {
        let (x, y) = (p.x as usize, p.y as usize);
        let (l, r) = (*self.left.get(x, y), *self.right.get(x, y));
        let (d, u) = (*self.down.get(x, y), *self.up.get(x, y));
        let horizontal = l.min(r) as f32 / (l + r).max(MIN_EXTENT) as f32;
        let vertical = d.min(u) as f32 / (d + u).max(MIN_EXTENT) as f32;
        let noise = sampler.terrain(p.x + offset.x, p.y + offset.y);
        cutoff + (1.0 - cutoff) * noise * horizontal * vertical
    }

    /// Breadth-first fill from `seed`. `None` if the fill leaks to the edge
    /// or the seed sits on the coast.
    fn flood(
        &self,
        seed: Point,
        sampler: &NoiseSampler,
        offset: Point,
        params: &ShapeParams,
    ) -> Option<Tilemap<f32>> {
        if self.is_coast(seed.x, seed.y) || !self.coast.contains(seed.x, seed.y) {
            return None;
        }
        let mut patch = Tilemap::new(self.coast.width, self.coast.height);
        let mut visited: Tilemap<bool> = Tilemap::new(self.coast.width, self.coast.height);
        let mut pending = VecDeque::new();
        visited.set(seed.x as usize, seed.y as usize, true);
        pending.push_back(seed);

        let mut visits = 0;
        while let Some(p) = pending.pop_front() {
            if self.on_edge(p) {
                return None;
            }
            patch.set(
                p.x as usize,
                p.y as usize,
                self.elevation(p, sampler, offset, params.water_cutoff),
            );
            visits += 1;
            if visits >= params.max_fill_visits {
                break;
            }
            for (nx, ny) in self.coast.neighbors(p.x as usize, p.y as usize) {
                if !*self.coast.get(nx, ny) && !*visited.get(nx, ny) {
                    visited.set(nx, ny, true);
                    pending.push_back(Point::new(nx as i32, ny as i32));
                }
            }
        }
        Some(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Closed square coast with corners (x0, y0) and (x0 + s, y0 + s).
    fn square_contour(x0: i32, y0: i32, s: i32) -> Vec<Point> {
        let mut pts = Vec::new();
        for i in 0..s {
            pts.push(Point::new(x0 + i, y0));
            pts.push(Point::new(x0 + s, y0 + i));
            pts.push(Point::new(x0 + s - i, y0 + s));
            pts.push(Point::new(x0, y0 + s - i));
        }
        pts
    }

    fn fill(contour: &[Point], rect: Rect) -> Result<Tilemap<f32>, FillError> {
        let sampler = NoiseSampler::new(9, &NoiseParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        fill_elevation(
            contour,
            rect,
            &sampler,
            Point::new(100, 200),
            &ShapeParams::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_square_contour_fill() {
        let contour = square_contour(20, 20, 30);
        let rect = Rect::new(Point::new(19, 19), Point::new(51, 51));
        let patch = fill(&contour, rect).unwrap();
        let cutoff = ShapeParams::default().water_cutoff;

        assert_eq!(patch.width, 33);
        // Coast cells get exactly the cut-off.
        for p in &contour {
            let l = rect.to_local(*p);
            assert_eq!(*patch.get(l.x as usize, l.y as usize), cutoff);
        }
        // Strictly inside: at least the cut-off.
        for y in 2..31 {
            for x in 2..31 {
                assert!(*patch.get(x, y) >= cutoff);
            }
        }
        // Next to the coast the distance product is zero.
        assert_eq!(*patch.get(2, 16), cutoff);
        // Outside the coast: untouched.
        assert_eq!(*patch.get(0, 0), 0.0);
        assert_eq!(*patch.get(32, 10), 0.0);
        // Deep inside rises above the cut-off unless the noise is flat zero.
        assert!(*patch.get(16, 16) >= cutoff);
    }

    #[test]
    fn test_center_outside_concave_coast_recovers() {
        // A U shape whose box center lies in the notch, outside the land.
        let mut contour = Vec::new();
        let outline = [
            Point::new(10, 10),
            Point::new(10, 60),
            Point::new(25, 60),
            Point::new(25, 25),
            Point::new(45, 25),
            Point::new(45, 60),
            Point::new(60, 60),
            Point::new(60, 10),
        ];
        for i in 0..outline.len() {
            let (a, b) = (outline[i], outline[(i + 1) % outline.len()]);
            let mut p = a;
            while p != b {
                contour.push(p);
                p = p.step_toward(b);
            }
        }
        let rect = Rect::new(Point::new(9, 9), Point::new(61, 61));
        let patch = fill(&contour, rect).unwrap();
        // A leg of the U is land, the notch is not.
        assert!(*patch.get(8, 30) > 0.0);
        assert_eq!(*patch.get(26, 45), 0.0);
    }

    #[test]
    fn test_open_contour_leaks() {
        let contour: Vec<Point> = (10..40).map(|x| Point::new(x, 20)).collect();
        let rect = Rect::new(Point::new(9, 9), Point::new(41, 31));
        assert_eq!(
            fill(&contour, rect),
            Err(FillError::Leaked {
                attempts: ShapeParams::default().fill_retries
            })
        );
    }

    #[test]
    fn test_solid_coast_has_no_seed() {
        let rect = Rect::new(Point::new(0, 0), Point::new(5, 5));
        let contour: Vec<Point> = rect.cells().collect();
        assert_eq!(fill(&contour, rect), Err(FillError::SeedOnCoast));
    }

    #[test]
    fn test_rays_and_nudge() {
        let contour = square_contour(10, 10, 10);
        let rect = Rect::new(Point::new(0, 0), Point::new(40, 30));
        let raster = CoastRaster::new(&contour, rect);
        assert_eq!(raster.rays(Point::new(15, 15)), [true; 4]);
        // Right of the square: only the left ray meets coast.
        let outside = Point::new(30, 15);
        assert_eq!(raster.rays(outside), [true, false, false, false]);
        let seed = raster.enclosed_seed(outside);
        assert!(seed.x > 10 && seed.x < 20);
        assert_eq!(raster.rays(seed), [true; 4]);
    }
}
