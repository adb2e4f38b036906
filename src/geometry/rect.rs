use serde::{Deserialize, Serialize};

use super::Point;

/// Axis-aligned rectangle between two lattice points. Both corners are
/// inclusive cells, so a rect covers `(width + 1) x (height + 1)` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub start: Point,
    pub end: Point,
}

impl Rect {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Smallest rect containing every point. `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut start = first;
        let mut end = first;
        for p in &points[1..] {
            start.x = start.x.min(p.x);
            start.y = start.y.min(p.y);
            end.x = end.x.max(p.x);
            end.y = end.y.max(p.y);
        }
        Some(Self { start, end })
    }

    pub fn width(&self) -> i32 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> i32 {
        self.end.y - self.start.y
    }

    /// Number of columns of cells covered.
    pub fn cols(&self) -> usize {
        (self.width() + 1).max(0) as usize
    }

    /// Number of rows of cells covered.
    pub fn rows(&self) -> usize {
        (self.height() + 1).max(0) as usize
    }

    pub fn perimeter(&self) -> i32 {
        2 * (self.width() + self.height())
    }

    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    pub fn longer_side(&self) -> i32 {
        self.width().max(self.height())
    }

    pub fn shorter_side(&self) -> i32 {
        self.width().min(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.start.x + self.width() / 2,
            self.start.y + self.height() / 2,
        )
    }

    /// Wider than tall.
    pub fn is_horizontal(&self) -> bool {
        self.width() > self.height()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.start.x && p.x <= self.end.x && p.y >= self.start.y && p.y <= self.end.y
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Whether the two rects share at least one cell.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.start.x <= other.end.x
            && other.start.x <= self.end.x
            && self.start.y <= other.end.y
            && other.start.y <= self.end.y
    }

    /// Grow (or shrink, for negative `by`) on every side.
    pub fn inflated(&self, by: i32) -> Rect {
        Rect::new(
            Point::new(self.start.x - by, self.start.y - by),
            Point::new(self.end.x + by, self.end.y + by),
        )
    }

    pub fn translated(&self, by: Point) -> Rect {
        Rect::new(self.start + by, self.end + by)
    }

    /// Clamp both corners onto a `side`-sized square map.
    pub fn clamped(&self, side: usize) -> Rect {
        Rect::new(self.start.clamped(side), self.end.clamped(side))
    }

    /// Whether every cell of the rect lies on a `side`-sized square map.
    pub fn fits_map(&self, side: usize) -> bool {
        let max = side as i32 - 1;
        self.start.x >= 0 && self.start.y >= 0 && self.end.x <= max && self.end.y <= max
    }

    /// Map-space point to rect-local coordinates.
    pub fn to_local(&self, p: Point) -> Point {
        p - self.start
    }

    /// Rect-local point to map-space coordinates.
    pub fn to_global(&self, p: Point) -> Point {
        p + self.start
    }

    /// Iterate over every covered cell in map space, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Point> {
        let (x0, x1) = (self.start.x, self.end.x);
        (self.start.y..=self.end.y).flat_map(move |y| (x0..=x1).map(move |x| Point::new(x, y)))
    }
}
