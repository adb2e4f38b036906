//! Inner boundary band that keeps the walk circling a region.

use rand::Rng;

use crate::config::ShapeParams;
use crate::geometry::{Angle, Canvas, Line, Point, Rect};

/// Smallest gap kept between the limiter and the middle of the box.
const MIN_HALF_SPAN: i32 = 10;

/// Lookahead used when aiming for the target fill.
const FILL_LOOKAHEAD: i32 = 4;

/// Inner rectangle of a walk box, stretched along the box's longer axis.
///
/// Sides: 0 = left, 1 = top, 2 = right, 3 = bottom. The walk circles the
/// limiter clockwise, staying between it and the outer box.
#[derive(Clone, Debug)]
pub struct Limiter {
    outer: Rect,
    inner: Rect,
    horizontal: bool,
    axis: Line,
    x_range: i32,
    y_range: i32,
}

impl Limiter {
    pub fn new(outer: Rect, params: &ShapeParams) -> Self {
        let shrink = params.inner_shrink_percent / 100.0;
        let horizontal = outer.is_horizontal();
        let (w, h) = (outer.width(), outer.height());

        let inner = if horizontal {
            let mid = outer.start.y + h / 2;
            let x_off = floor_offset((w as f32 * shrink / 2.0) as i32, w);
            let y_off = floor_offset((h as f32 * shrink / 2.0) as i32 / 2, h);
            Rect::new(
                Point::new(outer.start.x + x_off, mid - y_off),
                Point::new(outer.end.x - x_off, mid + y_off),
            )
        } else {
            let mid = outer.start.x + w / 2;
            let y_off = floor_offset((h as f32 * shrink / 2.0) as i32, h);
            let x_off = floor_offset((w as f32 * shrink / 2.0) as i32 / 2, w);
            Rect::new(
                Point::new(mid - x_off, outer.start.y + y_off),
                Point::new(mid + x_off, outer.end.y - y_off),
            )
        };

        let axis = if horizontal {
            Line::new(Point::new(inner.start.x, inner.end.y), inner.end)
        } else {
            Line::new(Point::new(inner.end.x, inner.start.y), inner.end)
        };

        Self {
            outer,
            inner,
            horizontal,
            axis,
            x_range: outer.end.x - inner.end.x,
            y_range: outer.end.y - inner.end.y,
        }
    }

    pub fn outer(&self) -> Rect {
        self.outer
    }

    pub fn inner(&self) -> Rect {
        self.inner
    }

    pub fn is_horizontal(&self) -> bool {
        self.horizontal
    }

    pub fn axis(&self) -> &Line {
        &self.axis
    }

    /// Free cells between the limiter and the outer box on the x sides.
    pub fn x_range(&self) -> i32 {
        self.x_range
    }

    /// Free cells between the limiter and the outer box on the y sides.
    pub fn y_range(&self) -> i32 {
        self.y_range
    }

    /// Whether at least `margin` cells separate the limiter from the outer
    /// box on every side.
    pub fn has_room(&self, margin: i32) -> bool {
        self.x_range >= margin && self.y_range >= margin
    }

    /// The walk starts on the top of wide boxes and the left of tall ones.
    pub fn start_side(&self) -> usize {
        if self.horizontal {
            1
        } else {
            0
        }
    }

    /// Starting node, about 65% along the starting side with a random
    /// offset toward the outer box.
    pub fn start_point<R: Rng>(&self, rng: &mut R) -> Point {
        let along = (self.axis.len() as f32 * 0.65) as i32;
        if self.start_side() == 0 {
            let x = if self.x_range > 8 {
                self.outer.start.x + rng.gen_range(4..(self.x_range / 2).max(5))
            } else {
                self.outer.start.x + 4
            };
            Point::new(x, self.inner.start.y + along)
        } else {
            let y = if self.y_range > 8 {
                self.outer.end.y - rng.gen_range(4..(self.y_range / 2).max(5))
            } else {
                self.outer.end.y - 4
            };
            Point::new(self.inner.start.x + along, y)
        }
    }

    /// Signed distance from `p` to the limiter, positive on the outer side.
    pub fn distance_to_inner(&self, p: Point, side: usize) -> i32 {
        match side {
            0 => self.inner.start.x - p.x,
            1 => p.y - self.inner.end.y,
            2 => p.x - self.inner.end.x,
            _ => self.inner.start.y - p.y,
        }
    }

    /// 0 at the limiter, 1 at the outer box.
    pub fn fill(&self, p: Point, side: usize) -> f32 {
        let range = if side % 2 == 0 {
            self.x_range
        } else {
            self.y_range
        };
        self.distance_to_inner(p, side) as f32 / range.max(1) as f32
    }

    /// Bearing from `p` toward a point a few cells ahead on `side` at the
    /// `target` fill.
    pub fn bearing_to_fill(&self, p: Point, side: usize, target: f32) -> Angle {
        let dx = (self.x_range as f32 * target) as i32;
        let dy = (self.y_range as f32 * target) as i32;
        let aim = match side {
            0 => Point::new(self.inner.start.x - dx, p.y + FILL_LOOKAHEAD),
            1 => Point::new(p.x + FILL_LOOKAHEAD, self.inner.end.y + dy),
            2 => Point::new(self.inner.end.x + dx, p.y - FILL_LOOKAHEAD),
            _ => Point::new(p.x - FILL_LOOKAHEAD, self.inner.start.y - dy),
        };
        p.bearing_to(aim)
    }

    /// Whether a node at `p` has walked past the end of `side`.
    pub fn passed_side(&self, p: Point, side: usize) -> bool {
        match side {
            0 => p.y > self.inner.end.y,
            1 => p.x > self.inner.end.x,
            2 => p.y < self.inner.start.y,
            _ => p.x < self.inner.start.x,
        }
    }

    /// Block the limiter outline on the walk canvas.
    pub fn stamp(&self, canvas: &mut Canvas) {
        canvas.block_outline(self.inner);
    }
}

/// Keep at least `MIN_HALF_SPAN` cells between the limiter edge and the
/// middle of a `side`-long axis.
fn floor_offset(offset: i32, side: i32) -> i32 {
    if side / 2 - offset < MIN_HALF_SPAN {
        (side / 2 - MIN_HALF_SPAN).max(0)
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BLOCKED;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn wide() -> Limiter {
        Limiter::new(
            Rect::new(Point::new(100, 100), Point::new(200, 150)),
            &ShapeParams::default(),
        )
    }

    #[test]
    fn test_wide_box_geometry() {
        let lim = wide();
        assert!(lim.is_horizontal());
        assert_eq!(lim.start_side(), 1);
        // 40% of 100 split over both ends.
        assert_eq!(lim.inner().start.x, 120);
        assert_eq!(lim.inner().end.x, 180);
        assert!(lim.outer().contains_rect(&lim.inner()));
        assert_eq!(lim.x_range(), 20);
        assert_eq!(lim.axis().len() as i32, lim.inner().width() + 1);
    }

    #[test]
    fn test_tall_box_mirrors_wide() {
        let lim = Limiter::new(
            Rect::new(Point::new(100, 100), Point::new(150, 200)),
            &ShapeParams::default(),
        );
        assert!(!lim.is_horizontal());
        assert_eq!(lim.start_side(), 0);
        assert_eq!(lim.inner().start.y, 120);
        assert_eq!(lim.inner().end.y, 180);
    }

    #[test]
    fn test_min_half_span() {
        let lim = Limiter::new(
            Rect::new(Point::new(0, 0), Point::new(30, 24)),
            &ShapeParams::default(),
        );
        // Half the height is 12, so the y offset may be at most 2.
        assert!(lim.inner().height() <= 4);
        assert!(lim.inner().width() >= 2);
    }

    #[test]
    fn test_room_around_band() {
        assert!(wide().has_room(6));
        let thin = Limiter::new(
            Rect::new(Point::new(0, 0), Point::new(6, 60)),
            &ShapeParams::default(),
        );
        assert!(!thin.has_room(6));
    }

    #[test]
    fn test_distance_and_fill() {
        let lim = wide();
        let top = lim.inner().end.y;
        let p = Point::new(150, top + lim.y_range() / 2);
        assert_eq!(lim.distance_to_inner(p, 1), lim.y_range() / 2);
        assert!((lim.fill(p, 1) - 0.5).abs() < 0.05);
        assert!(lim.distance_to_inner(Point::new(150, top - 3), 1) < 0);
        assert!((lim.fill(Point::new(100, 120), 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fill_bearing_points_along_side() {
        let lim = wide();
        // On the top side, heading is clockwise around the limiter: +x.
        let p = Point::new(150, lim.inner().end.y + (lim.y_range() as f32 * 0.7) as i32);
        let bearing = lim.bearing_to_fill(p, 1, 0.7);
        assert!((bearing.degrees() - 90.0).abs() < 1.0);

        // Too far out: steer back toward the limiter (between +x and -y).
        let far = Point::new(150, lim.outer().end.y);
        let b = lim.bearing_to_fill(far, 1, 0.2).degrees();
        assert!(b > 90.0 && b < 180.0);
    }

    #[test]
    fn test_start_point_inside_outer_band() {
        let lim = wide();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let p = lim.start_point(&mut rng);
            assert!(lim.outer().contains(p));
            assert!(lim.distance_to_inner(p, 1) > 0);
        }
    }

    #[test]
    fn test_stamp_blocks_outline() {
        let lim = wide();
        let mut canvas = Canvas::new(lim.outer());
        lim.stamp(&mut canvas);
        assert_eq!(canvas.occupant(lim.inner().end), Some(BLOCKED));
        assert!(canvas.is_free(lim.inner().center()));
    }
}
