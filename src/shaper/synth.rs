//! Shape synthesis
//!
//! Grows a closed polygon inside a region by a constrained random walk. The
//! walk circles the region's limiter clockwise in fixed-length steps. At
//! every node it scans a fan of bearings around the current side's base
//! bearing, keeps the collision-free sub-ranges, prefers small turns, and
//! blends a random pick with the bearing that would bring the running fill
//! back to its target. After one full lap it heads home to the start node.

use rand::Rng;
use tracing::debug;

use crate::config::{GeneratorConfig, ShapeParams};
use crate::error::SynthesisError;
use crate::geometry::{Angle, Canvas, Line, Point};

use super::collision::CollisionMap;
use super::limiter::Limiter;
use super::partition::Region;
use super::shape::{Shape, WalkStats};

/// Cells kept clear around a shape's box so its coastline has room to
/// wander without touching a neighbour.
pub fn footprint_halo(cfg: &GeneratorConfig) -> i32 {
    cfg.contour_distance as i32 / 2 + 2
}

/// Grow, rotate and validate the base polygon for `region`.
///
/// Reads the collision map but does not write it; the caller reserves the
/// returned shape's footprint.
pub fn synthesize<R: Rng>(
    region: &Region,
    collisions: &CollisionMap,
    cfg: &GeneratorConfig,
    params: &ShapeParams,
    rng: &mut R,
) -> Result<Shape, SynthesisError> {
    let map_side = collisions.side();
    let halo = footprint_halo(cfg);
    let walk_box = region.rect.inflated(-(halo + 1));
    let limiter = Limiter::new(walk_box, params);
    if walk_box.shorter_side() <= 0 || !limiter.has_room(params.step_length + 2) {
        return Err(SynthesisError::RegionTooSmall {
            region: region.rect,
        });
    }

    let mut canvas = collisions.canvas_for(walk_box);
    limiter.stamp(&mut canvas);

    let base_fill = params.min_fill + (params.max_fill - params.min_fill) * cfg.coverage;
    let fill_target = base_fill * rng.gen_range(0.9..=1.1f32);
    let rotation = rng.gen_range(-params.max_rotation..params.max_rotation);

    let mut walk = Walk {
        id: region.id,
        limiter: &limiter,
        canvas: &mut canvas,
        params,
        map_side,
        fill_target,
        fill_threshold: cfg.fill_threshold,
    };
    let (nodes, mut stats) = walk.run(rng)?;

    let shape = Shape::from_nodes(region.id, nodes, map_side);
    let fits = |s: &Shape| {
        let footprint = s.footprint(halo);
        region.rect.contains_rect(&footprint) && collisions.is_free(footprint, s.id)
    };
    let turned = [rotation, rotation / 2.0].into_iter().find_map(|angle| {
        let rotated = shape.rotated(angle, map_side);
        (rotated.is_simple() && fits(&rotated)).then_some((angle, rotated))
    });

    let mut shape = if let Some((angle, rotated)) = turned {
        stats.rotation = angle;
        rotated
    } else if !shape.is_simple() {
        return Err(SynthesisError::SelfIntersecting);
    } else if !fits(&shape) {
        return Err(SynthesisError::NoPlacement(shape.footprint(halo)));
    } else {
        debug!(shape = region.id, rotation, "rotation rejected, keeping upright polygon");
        shape
    };
    shape.walk = stats;

    debug!(
        shape = shape.id,
        nodes = shape.nodes.len(),
        rect = ?shape.rect,
        fill = shape.walk.mean_fill,
        "synthesized base polygon"
    );
    Ok(shape)
}

struct Walk<'a> {
    id: u32,
    limiter: &'a Limiter,
    canvas: &'a mut Canvas,
    params: &'a ShapeParams,
    map_side: usize,
    fill_target: f32,
    fill_threshold: f32,
}

impl Walk<'_> {
    fn run<R: Rng>(&mut self, rng: &mut R) -> Result<(Vec<Point>, WalkStats), SynthesisError> {
        let start = self.limiter.start_point(rng);
        if !self.canvas.is_free(start) {
            return Err(SynthesisError::NoFreeBearing { node: 0 });
        }

        let start_side = self.limiter.start_side();
        let mut side = start_side;
        let mut last = Angle::for_side(side);
        let mut fill = self.limiter.fill(start, side);
        let mut lapped = false;
        let mut stats = WalkStats {
            fill_target: self.fill_target,
            ..Default::default()
        };

        let mut nodes = vec![start];
        loop {
            if nodes.len() >= self.params.max_walk_nodes {
                return Err(SynthesisError::DidNotClose(self.params.max_walk_nodes));
            }
            let prev = nodes[nodes.len() - 1];

            let bearing = if lapped {
                stats.closing_nodes += 1;
                self.homing_bearing(prev, start, rng)
            } else {
                self.free_bearing(prev, side, last, fill, rng)
                    .ok_or(SynthesisError::NoFreeBearing { node: nodes.len() - 1 })?
            };

            let next = self.step(prev, bearing);
            Line::new(prev, next).stamp(self.canvas, self.id);
            nodes.push(next);
            last = bearing;

            if !lapped && self.limiter.passed_side(next, side) {
                side = (side + 1) % 4;
                stats.side_switches += 1;
                lapped = side == start_side;
            }

            let n = (nodes.len() - 1) as f32;
            fill = (fill * n + self.limiter.fill(next, side)) / (n + 1.0);

            if lapped && next.steps(start) < self.params.close_steps {
                break;
            }
        }

        // The closing edge back to the start node.
        let last_node = nodes[nodes.len() - 1];
        Line::new(last_node, start).stamp(self.canvas, self.id);

        stats.mean_fill = fill;
        Ok((nodes, stats))
    }

    fn step(&self, from: Point, bearing: Angle) -> Point {
        Point::from_polar(from, bearing, self.params.step_length as f32, self.map_side)
    }

    /// A step along `bearing` moves and crosses nothing.
    fn is_free(&self, from: Point, bearing: Angle) -> bool {
        let to = self.step(from, bearing);
        to != from && !Line::new(from, to).crosses_occupied(self.canvas)
    }

    /// Pick the next bearing on `side`, or `None` if every scanned bearing
    /// collides.
    ///
    /// All angles are handled as offsets from the side's base bearing, which
    /// keeps range arithmetic free of wrap-around.
    fn free_bearing<R: Rng>(
        &self,
        prev: Point,
        side: usize,
        last: Angle,
        fill: f32,
        rng: &mut R,
    ) -> Option<Angle> {
        let p = self.params;
        let base = Angle::for_side(side);
        let half = p.scan_window / 2.0;
        let to_inner = self.limiter.distance_to_inner(prev, side);
        // Close to the limiter only outward bearings are scanned.
        let scan_end = if to_inner < 4 { 0.0 } else { half };

        let ranges = self.free_ranges(prev, base, -half, scan_end);
        let (lo, hi) = ranges.into_iter().min_by(|a, b| {
            distance_from_base(*a)
                .partial_cmp(&distance_from_base(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        // Prefer bearings within the turn limit of the previous segment.
        let turn = base.diff(last);
        let (turn_lo, turn_hi) = (turn - p.max_turn, turn + p.max_turn);
        let (min, max) = if lo.max(turn_lo) <= hi.min(turn_hi) {
            (lo.max(turn_lo), hi.min(turn_hi))
        } else if hi < turn_lo {
            (hi, hi)
        } else {
            (lo, lo)
        };

        let free = if max > min { rng.gen_range(min..=max) } else { min };

        let goal = base.diff(self.limiter.bearing_to_fill(prev, side, self.fill_target));
        let off_target = (self.fill_target - fill).abs();
        let strength = if to_inner < 0 || off_target < self.fill_threshold {
            0.0
        } else {
            off_target.min(1.0)
        };
        let offset = (free + (goal - free) * strength).clamp(min, max);
        Some(base + offset)
    }

    /// Maximal runs of collision-free scan offsets in `[from, to]`.
    fn free_ranges(&self, prev: Point, base: Angle, from: f32, to: f32) -> Vec<(f32, f32)> {
        let step = self.params.scan_step;
        let count = ((to - from) / step).round() as i32;
        let mut ranges = Vec::new();
        let mut open: Option<f32> = None;
        for k in 0..=count {
            let offset = from + k as f32 * step;
            let free = self.is_free(prev, base + offset);
            match (free, open) {
                (true, None) => open = Some(offset),
                (false, Some(lo)) => {
                    ranges.push((lo, offset - step));
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(lo) = open {
            ranges.push((lo, to));
        }
        ranges
    }

    /// Bearing home with a little jitter. Falls back to the nearest free
    /// bearing around home, then to home itself.
    fn homing_bearing<R: Rng>(&self, prev: Point, start: Point, rng: &mut R) -> Angle {
        let p = self.params;
        let home = prev.bearing_to(start);
        let jittered = home + rng.gen_range(-p.closing_jitter..=p.closing_jitter);
        if self.is_free(prev, jittered) {
            return jittered;
        }
        let tries = (p.max_turn / p.scan_step) as i32;
        for k in 0..=tries {
            for sign in [1.0, -1.0] {
                let candidate = home + sign * k as f32 * p.scan_step;
                if self.is_free(prev, candidate) {
                    return candidate;
                }
            }
        }
        home
    }
}

/// How far a range of offsets lies from offset 0 (the base bearing).
fn distance_from_base((lo, hi): (f32, f32)) -> f32 {
    if lo <= 0.0 && hi >= 0.0 {
        0.0
    } else {
        lo.abs().min(hi.abs())
    }
}
