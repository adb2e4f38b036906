//! Land pressure around existing land.
//!
//! Each cell counts the land points within `radius` (square neighbourhood),
//! capped at `(radius + 1)²`. Land cells themselves hold a sentinel one
//! above the cap and are never lowered again. Coastline refinement steers
//! toward low-pressure cells to keep landmasses apart.
//!
//! Refinement runs one task per shape. Tasks read the shared field through a
//! [`DensityView`] that records their own stamps privately; the stamps are
//! folded back into the field after the join with [`DensityField::absorb`].
//! Stamping is order-independent, so the merged field does not depend on
//! scheduling.

use std::collections::{HashMap, HashSet};

use crate::geometry::Point;
use crate::tilemap::Tilemap;

#[derive(Clone, Debug)]
pub struct DensityField {
    radius: i32,
    max: u32,
    land: u32,
    cells: Tilemap<u32>,
}

impl DensityField {
    /// A field for a `side`-sized map with its outer ring already stamped as
    /// land, so coastlines are pushed away from the map edge.
    pub fn new(side: usize, radius: usize) -> Self {
        let radius = radius.min(side) as i32;
        let max = ((radius + 1) * (radius + 1)) as u32;
        let mut field = Self {
            radius,
            max,
            land: max + 1,
            cells: Tilemap::new(side, side),
        };

        let last = side as i32 - 1;
        for i in 0..side as i32 {
            field.add_land_at(Point::new(i, 0));
            field.add_land_at(Point::new(i, last));
            field.add_land_at(Point::new(0, i));
            field.add_land_at(Point::new(last, i));
        }
        field
    }

    pub fn side(&self) -> usize {
        self.cells.width
    }

    pub fn max_density(&self) -> u32 {
        self.max
    }

    pub fn land_value(&self) -> u32 {
        self.land
    }

    /// Pressure at `p`. Off-map cells read as land.
    pub fn value(&self, p: Point) -> u32 {
        self.cells.try_get(p.x, p.y).copied().unwrap_or(self.land)
    }

    pub fn is_land(&self, p: Point) -> bool {
        self.value(p) == self.land
    }

    /// Mark `p` as land and raise the pressure of every non-land cell within
    /// the radius. Stamping a cell that is already land changes nothing.
    pub fn add_land_at(&mut self, p: Point) {
        if !self.cells.contains(p.x, p.y) || self.is_land(p) {
            return;
        }
        self.cells.set(p.x as usize, p.y as usize, self.land);
        let (land, max) = (self.land, self.max);
        for y in p.y - self.radius..=p.y + self.radius {
            for x in p.x - self.radius..=p.x + self.radius {
                if !self.cells.contains(x, y) {
                    continue;
                }
                let cell = self.cells.get_mut(x as usize, y as usize);
                if *cell != land && *cell < max {
                    *cell += 1;
                }
            }
        }
    }

    /// Fold a finished view's stamps into the field.
    pub fn absorb(&mut self, stamps: &[Point]) {
        for &p in stamps {
            self.add_land_at(p);
        }
    }

    /// Read-through view with a private stamp overlay.
    pub fn view(&self) -> DensityView<'_> {
        DensityView {
            base: self,
            stamps: Vec::new(),
            land: HashSet::new(),
            pressure: HashMap::new(),
        }
    }
}

/// The shared field as seen by one refinement task: base values plus this
/// task's own stamps.
#[derive(Debug)]
pub struct DensityView<'a> {
    base: &'a DensityField,
    stamps: Vec<Point>,
    land: HashSet<Point>,
    pressure: HashMap<Point, u32>,
}

impl DensityView<'_> {
    pub fn value(&self, p: Point) -> u32 {
        let base = self.base.value(p);
        if base == self.base.land || self.land.contains(&p) {
            return self.base.land;
        }
        let extra = self.pressure.get(&p).copied().unwrap_or(0);
        (base + extra).min(self.base.max)
    }

    pub fn add_land_at(&mut self, p: Point) {
        if !self.base.cells.contains(p.x, p.y) || self.base.is_land(p) || !self.land.insert(p) {
            return;
        }
        self.stamps.push(p);
        let r = self.base.radius;
        for y in p.y - r..=p.y + r {
            for x in p.x - r..=p.x + r {
                if self.base.cells.contains(x, y) {
                    *self.pressure.entry(Point::new(x, y)).or_insert(0) += 1;
                }
            }
        }
    }

    /// Stamps recorded through this view, in order.
    pub fn into_stamps(self) -> Vec<Point> {
        self.stamps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_is_land() {
        let field = DensityField::new(64, 4);
        assert!(field.is_land(Point::new(0, 17)));
        assert!(field.is_land(Point::new(63, 63)));
        assert!(field.is_land(Point::new(-1, 10)));
        assert!(!field.is_land(Point::new(32, 32)));
        // Within the radius of the border, pressure is raised.
        assert!(field.value(Point::new(3, 32)) > 0);
        assert_eq!(field.value(Point::new(32, 32)), 0);
    }

    #[test]
    fn test_pressure_is_capped() {
        let mut field = DensityField::new(64, 2);
        for y in 20..30 {
            for x in 20..30 {
                if (x + y) % 2 == 0 {
                    field.add_land_at(Point::new(x, y));
                }
            }
        }
        for (_, _, &v) in field.cells.iter() {
            assert!(v <= field.max_density() || v == field.land_value());
        }
        assert_eq!(field.value(Point::new(25, 26)), field.max_density());
    }

    #[test]
    fn test_land_is_never_lowered() {
        let mut field = DensityField::new(64, 3);
        let p = Point::new(30, 30);
        field.add_land_at(p);
        let land = field.land_value();
        for dx in -3..=3 {
            field.add_land_at(Point::new(30 + dx, 31));
            assert_eq!(field.value(p), land);
        }
        let before: Vec<u32> = field.cells.as_slice().to_vec();
        field.add_land_at(Point::new(33, 33));
        for (old, new) in before.iter().zip(field.cells.as_slice()) {
            assert!(new >= old);
        }
    }

    #[test]
    fn test_view_matches_direct_stamping() {
        let base = DensityField::new(64, 3);
        let points = [Point::new(20, 20), Point::new(21, 20), Point::new(22, 21), Point::new(40, 9)];

        let mut direct = base.clone();
        let mut view = base.view();
        for &p in &points {
            direct.add_land_at(p);
            view.add_land_at(p);
        }
        for y in 0..64 {
            for x in 0..64 {
                let p = Point::new(x, y);
                assert_eq!(view.value(p), direct.value(p), "mismatch at {:?}", p);
            }
        }

        let stamps = view.into_stamps();
        let mut merged = base.clone();
        merged.absorb(&stamps);
        assert_eq!(merged.cells, direct.cells);
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let base = DensityField::new(64, 2);
        let a = vec![Point::new(10, 10), Point::new(11, 10), Point::new(12, 12)];
        let b = vec![Point::new(12, 11), Point::new(13, 13), Point::new(10, 11)];

        let mut ab = base.clone();
        ab.absorb(&a);
        ab.absorb(&b);
        let mut ba = base.clone();
        ba.absorb(&b);
        ba.absorb(&a);
        assert_eq!(ab.cells, ba.cells);
    }
}
