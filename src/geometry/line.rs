use super::{Canvas, Point};

/// A 4-connected lattice path approximating the straight segment between
/// two points. Holds exactly `|dx| + |dy| + 1` cells.
///
/// The first and last step always run along the dominant axis, so a short
/// segment leaves its endpoints squarely and the walk that chains segments
/// keeps a wide fan of free bearings at every node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    points: Vec<Point>,
}

impl Line {
    pub fn new(origin: Point, end: Point) -> Self {
        let dx = end.x - origin.x;
        let dy = end.y - origin.y;
        let total = (dx.abs() + dy.abs() + 1) as usize;

        let mut points = Vec::with_capacity(total);
        points.push(origin);
        if total == 1 {
            return Self { points };
        }
        if total == 2 {
            points.push(end);
            return Self { points };
        }

        let (sx, sy) = (dx.signum(), dy.signum());
        let x_major = dx.abs() > dy.abs();
        let (first, before_end) = if x_major {
            (
                Point::new(origin.x + sx, origin.y),
                Point::new(end.x - sx, end.y),
            )
        } else {
            (
                Point::new(origin.x, origin.y + sy),
                Point::new(end.x, end.y - sy),
            )
        };

        points.push(first);
        if total == 3 {
            points.push(end);
            return Self { points };
        }

        // Grid walk between the two fixed inner cells.
        let nx = (before_end.x - first.x).abs();
        let ny = (before_end.y - first.y).abs();
        let step_x = (before_end.x - first.x).signum();
        let step_y = (before_end.y - first.y).signum();
        let (mut ix, mut iy) = (0, 0);
        let mut cur = first;
        while ix < nx || iy < ny {
            if (1 + 2 * ix) * ny < (1 + 2 * iy) * nx {
                cur.x += step_x;
                ix += 1;
            } else {
                cur.y += step_y;
                iy += 1;
            }
            points.push(cur);
        }

        points.push(end);
        debug_assert_eq!(points.len(), total);
        Self { points }
    }

    pub fn origin(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Write every cell of the line into the canvas under `id`.
    pub fn stamp(&self, canvas: &mut Canvas, id: u32) {
        for &p in &self.points {
            canvas.mark(p, id);
        }
    }

    /// Whether any cell after the origin hits an occupied (or off-canvas)
    /// cell. The origin is skipped since it is the node the line grows from.
    pub fn crosses_occupied(&self, canvas: &Canvas) -> bool {
        self.points[1..].iter().any(|&p| !canvas.is_free(p))
    }
}
