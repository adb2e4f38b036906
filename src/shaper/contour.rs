//! Coastline refinement
//!
//! Follows a shape's base polygon one cell at a time, letting noise and the
//! density field pick between three candidate steps around the local wall
//! direction. An anchor on the base path advances one cell per step and every
//! coast cell is held inside a window around it, so the coastline stays near
//! the polygon and always comes back to its start.

use tracing::{debug, warn};

use crate::config::ShapeParams;
use crate::density::DensityView;
use crate::geometry::{Point, Rect};
use crate::sampler::NoiseSampler;

use super::shape::Shape;

/// The eight unit moves, clockwise from +y.
const MOVES: [Point; 8] = [
    Point::new(0, 1),
    Point::new(1, 1),
    Point::new(1, 0),
    Point::new(1, -1),
    Point::new(0, -1),
    Point::new(-1, -1),
    Point::new(-1, 0),
    Point::new(-1, 1),
];

/// Base edges left before the start at which the contour turns for home.
const CLOSING_EDGES: i64 = 3;

/// Shared settings for refining every shape of a run.
#[derive(Clone, Copy, Debug)]
pub struct Refiner<'a> {
    pub sampler: &'a NoiseSampler,
    pub params: &'a ShapeParams,
    /// Largest distance between a coast cell and the base polygon
    pub deviation: i32,
    /// Footprint halo; the coast never leaves the shape's footprint
    pub halo: i32,
    pub map_side: usize,
}

impl Refiner<'_> {
    /// Replace `shape`'s contour with a refined coastline and shrink its box
    /// to that coastline. Every coast cell is stamped into `density`.
    ///
    /// Hitting the point ceiling is not an error; the contour is left open
    /// and `contour_closed` stays false.
    pub fn refine(&self, shape: &mut Shape, density: &mut DensityView<'_>) {
        let path = shape.base_path();
        if path.len() < 4 {
            warn!(shape = shape.id, "base path too short to refine");
            shape.contour = path;
            shape.contour_closed = false;
            return;
        }

        let len = path.len() as i64;
        let half = (self.deviation / 2).max(1);
        let bound = shape
            .footprint(self.halo)
            .inflated(-1)
            .clamped(self.map_side);
        let edge = (len / shape.nodes.len().max(1) as i64).max(1);
        let homeward = len - (CLOSING_EDGES * edge).min(len / 4);
        let start = path[0];

        let mut cursor = Cursor {
            path: &path,
            pos: 0,
            near: 0,
            search: self.params.cursor_search as i64,
        };
        let mut coast = Coast {
            points: vec![start],
            density,
        };
        coast.density.add_land_at(start);

        let mut cur = start;
        let mut looking = false;
        let mut closed = false;

        while coast.points.len() < self.params.max_contour_points {
            cursor.pos += 1;
            if !looking {
                looking = cursor.pos > len / 2;
            }
            if cursor.pos >= len {
                coast.bridge(cur, start);
                closed = looking;
                break;
            }
            let closing = looking && cursor.pos > homeward;
            if closing && cur.touches(start) {
                closed = true;
                break;
            }

            let wanted = if closing {
                cur.step_toward(start)
            } else {
                cursor.track(cur);
                let dir = cursor.at(cursor.near + half as i64) - cursor.at(cursor.near);
                cur + self.pick_move(cur, dir, coast.density)
            };
            let next = self.confine(wanted, cursor.at(cursor.pos), half, bound);
            if next == cur {
                continue;
            }
            coast.bridge(cur, next);
            coast.push(next);
            cur = next;
        }

        if !closed {
            warn!(
                shape = shape.id,
                points = coast.points.len(),
                "contour truncated before closing"
            );
        }

        let points = coast.points;
        if let Some(bbox) = Rect::bounding(&points) {
            shape.rect = bbox.inflated(1).clamped(self.map_side);
        }
        debug!(
            shape = shape.id,
            points = points.len(),
            closed,
            rect = ?shape.rect,
            "refined coastline"
        );
        shape.contour = points;
        shape.contour_closed = closed;
    }

    /// One of the three moves around the wall direction `dir`: the least
    /// dense candidate, with noise breaking ties.
    fn pick_move(&self, cur: Point, dir: Point, density: &DensityView<'_>) -> Point {
        let unit = Point::new(dir.x.signum(), dir.y.signum());
        let d = MOVES.iter().position(|&m| m == unit).unwrap_or(0);
        let candidates = [MOVES[(d + 7) % 8], MOVES[d], MOVES[(d + 1) % 8]];

        let noisy = match self.sampler.point(cur.x, cur.y) {
            v if v > 0.66 => 2,
            v if v > 0.33 => 1,
            _ => 0,
        };

        let values = candidates.map(|m| density.value(cur + m));
        let lowest = values.iter().copied().min().unwrap_or(0);
        let choice = if values[noisy] == lowest {
            noisy
        } else {
            values.iter().position(|&v| v == lowest).unwrap_or(noisy)
        };
        candidates[choice]
    }

    /// Clamp onto the map, into the window around `anchor`, then into
    /// `bound`.
    fn confine(&self, p: Point, anchor: Point, half: i32, bound: Rect) -> Point {
        let p = p.clamped(self.map_side);
        let x = p.x.clamp(anchor.x - half, anchor.x + half);
        let y = p.y.clamp(anchor.y - half, anchor.y + half);
        Point::new(
            x.clamp(bound.start.x, bound.end.x),
            y.clamp(bound.start.y, bound.end.y),
        )
    }
}

/// Position on the cyclic base path; cells are read modulo its length.
///
/// `pos` is the anchor and only moves forward. `near` is the base cell
/// closest to the coast, searched on both sides of the anchor, and may lag
/// behind or run ahead of it.
struct Cursor<'a> {
    path: &'a [Point],
    pos: i64,
    near: i64,
    search: i64,
}

impl Cursor<'_> {
    fn at(&self, pos: i64) -> Point {
        self.path[pos.rem_euclid(self.path.len() as i64) as usize]
    }

    /// Point `near` at the base cell closest to `p` within the search range
    /// of the anchor.
    fn track(&mut self, p: Point) {
        let offset = (-self.search..=self.search)
            .min_by_key(|&k| {
                let b = self.at(self.pos + k);
                (p.chebyshev(b), p.steps(b), k.abs())
            })
            .unwrap_or(0);
        self.near = self.pos + offset;
    }
}

/// Accepted coast cells and the density overlay they are stamped into.
struct Coast<'v, 'a> {
    points: Vec<Point>,
    density: &'v mut DensityView<'a>,
}

impl Coast<'_, '_> {
    /// Append `p`. A repeat of the last cell is dropped and a step straight
    /// back onto the cell before it removes the spike.
    fn push(&mut self, p: Point) {
        let n = self.points.len();
        if self.points.last() == Some(&p) {
            return;
        }
        if n >= 2 && self.points[n - 2] == p {
            self.points.pop();
            return;
        }
        self.points.push(p);
        self.density.add_land_at(p);
    }

    /// Fill the gap between `from` and `to` with an 8-connected run,
    /// exclusive of both ends.
    fn bridge(&mut self, from: Point, to: Point) {
        let mut p = from;
        while !p.touches(to) {
            p = p.step_toward(to);
            self.push(p);
        }
    }
}
