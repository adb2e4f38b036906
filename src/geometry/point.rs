use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::Angle;

/// A cell on the integer map lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `length` cells from `origin` along `bearing`, clamped onto
    /// a `side`-sized square map. Offsets truncate toward zero.
    pub fn from_polar(origin: Point, bearing: Angle, length: f32, side: usize) -> Self {
        let rad = bearing.radians();
        let step_x = (rad.sin() * length) as i32;
        let step_y = (rad.cos() * length) as i32;
        Point::new(origin.x + step_x, origin.y + step_y).clamped(side)
    }

    /// Clamp onto a `side`-sized square map.
    pub fn clamped(self, side: usize) -> Self {
        let max = side as i32 - 1;
        Point::new(self.x.clamp(0, max), self.y.clamp(0, max))
    }

    /// Manhattan distance.
    pub fn steps(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance.
    pub fn chebyshev(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from `self` toward `other`. Identical points give 0°.
    pub fn bearing_to(self, other: Point) -> Angle {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return Angle::new(0.0);
        }
        Angle::new(dx.atan2(dy).to_degrees())
    }

    /// Rotate clockwise by `degrees` about `center`, rounding to the nearest
    /// cell and clamping onto a `side`-sized map.
    pub fn rotated_about(self, center: Point, degrees: f32, side: usize) -> Self {
        let bearing = center.bearing_to(self) + degrees;
        let radius = center.distance(self);
        let rad = bearing.radians();
        Point::new(
            center.x + (rad.sin() * radius).round() as i32,
            center.y + (rad.cos() * radius).round() as i32,
        )
        .clamped(side)
    }

    /// Whether the two points touch, diagonals included (a point touches
    /// itself).
    pub fn touches(self, other: Point) -> bool {
        self.chebyshev(other) <= 1
    }

    /// Unit step (each axis in -1..=1) from `self` toward `other`.
    pub fn step_toward(self, other: Point) -> Point {
        Point::new(
            self.x + (other.x - self.x).signum(),
            self.y + (other.y - self.y).signum(),
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
