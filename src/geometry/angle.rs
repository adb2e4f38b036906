//! Bearings in degrees with wrap-around arithmetic.
//!
//! Bearings follow the lattice convention used across the shaper: 0° points
//! along +y, 90° along +x, so increasing bearings turn clockwise in a y-up
//! frame.

use std::fmt;
use std::ops::{Add, Sub};

/// A bearing normalized to `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle(f32);

impl Angle {
    pub fn new(degrees: f32) -> Self {
        let mut d = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if d >= 360.0 {
            d = 0.0;
        }
        Self(d)
    }

    /// Base bearing for a walk side (0 = left, 1 = top, 2 = right, 3 = bottom).
    pub fn for_side(side: usize) -> Self {
        Self::new(90.0 * side as f32)
    }

    pub fn degrees(self) -> f32 {
        self.0
    }

    pub fn radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Shortest signed turn from `self` to `to`, in `(-180, 180]`.
    /// Positive means `to` lies clockwise of `self`.
    pub fn diff(self, to: Angle) -> f32 {
        let mut d = to.0 - self.0;
        if d > 180.0 {
            d -= 360.0;
        } else if d <= -180.0 {
            d += 360.0;
        }
        d
    }

    /// `self` lies strictly clockwise of `other`.
    pub fn is_clockwise_of(self, other: Angle) -> bool {
        self.diff(other) < 0.0
    }

    /// `self` lies strictly counter-clockwise of `other`.
    pub fn is_counter_clockwise_of(self, other: Angle) -> bool {
        self.diff(other) > 0.0
    }

    /// Whether `self` falls inside the clockwise sweep from `from` to `to`.
    /// Both ends are inclusive; the sweep must be shorter than 180°.
    pub fn is_between(self, from: Angle, to: Angle) -> bool {
        from.diff(self) >= 0.0 && self.diff(to) >= 0.0
    }
}

impl Add<f32> for Angle {
    type Output = Angle;

    fn add(self, rhs: f32) -> Angle {
        Angle::new(self.0 + rhs)
    }
}

impl Sub<f32> for Angle {
    type Output = Angle;

    fn sub(self, rhs: f32) -> Angle {
        Angle::new(self.0 - rhs)
    }
}

impl Add<Angle> for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::new(self.0 + rhs.0)
    }
}

impl Sub<Angle> for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::new(self.0 - rhs.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Angle::new(360.0).degrees(), 0.0);
        assert_eq!(Angle::new(-90.0).degrees(), 270.0);
        assert_eq!(Angle::new(725.0).degrees(), 5.0);
        assert_eq!((Angle::new(42.0) + 360.0).degrees(), 42.0);
        assert!(Angle::new(-1e-7).degrees() < 360.0);
    }

    #[test]
    fn test_diff_of_self_is_zero() {
        for d in (0..720).step_by(7) {
            let a = Angle::new(d as f32 * 0.73);
            assert_eq!(a.diff(a), 0.0);
        }
    }

    #[test]
    fn test_diff_is_bounded() {
        for a in (0..360).step_by(9) {
            for b in (0..360).step_by(11) {
                let d = Angle::new(a as f32).diff(Angle::new(b as f32));
                assert!(d > -180.0 && d <= 180.0, "diff {} out of range", d);
            }
        }
        assert_eq!(Angle::new(0.0).diff(Angle::new(180.0)), 180.0);
        assert_eq!(Angle::new(180.0).diff(Angle::new(0.0)), 180.0);
    }

    #[test]
    fn test_diff_wraps_across_zero() {
        assert_eq!(Angle::new(350.0).diff(Angle::new(10.0)), 20.0);
        assert_eq!(Angle::new(10.0).diff(Angle::new(350.0)), -20.0);
    }

    #[test]
    fn test_clockwise_ordering() {
        let north = Angle::new(0.0);
        let east = Angle::new(90.0);
        assert!(east.is_clockwise_of(north));
        assert!(north.is_counter_clockwise_of(east));
        assert!(Angle::new(5.0).is_clockwise_of(Angle::new(355.0)));
        assert!(!north.is_clockwise_of(north));
    }

    #[test]
    fn test_is_between_across_zero() {
        let from = Angle::new(300.0);
        let to = Angle::new(30.0);
        assert!(Angle::new(0.0).is_between(from, to));
        assert!(Angle::new(300.0).is_between(from, to));
        assert!(!Angle::new(90.0).is_between(from, to));
    }
}
