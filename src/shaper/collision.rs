//! Map-wide record of which shape owns which cells.

use crate::geometry::{Canvas, Point, Rect, BLOCKED};
use crate::tilemap::Tilemap;

/// Direction in which free space around a footprint is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slack {
    Left,
    Right,
    Down,
    Up,
}

/// Global collision buffer. `0` is free, otherwise a shape id.
///
/// Written only during the serial phase; shapes reserve their footprint
/// here so that later regions, rotations and moves can see them.
#[derive(Clone, Debug)]
pub struct CollisionMap {
    cells: Tilemap<u32>,
}

impl CollisionMap {
    pub fn new(side: usize) -> Self {
        Self {
            cells: Tilemap::new(side, side),
        }
    }

    pub fn side(&self) -> usize {
        self.cells.width
    }

    pub fn occupant(&self, p: Point) -> Option<u32> {
        self.cells.try_get(p.x, p.y).copied()
    }

    /// Whether `rect` lies on the map and every cell is free or owned by
    /// `owner`.
    pub fn is_free(&self, rect: Rect, owner: u32) -> bool {
        rect.fits_map(self.side())
            && rect
                .cells()
                .all(|p| matches!(self.occupant(p), Some(v) if v == 0 || v == owner))
    }

    /// Reserve every on-map cell of `rect` for `id`.
    pub fn stamp(&mut self, rect: Rect, id: u32) {
        for p in rect.cells() {
            self.cells.try_set(p.x, p.y, id);
        }
    }

    /// Release the cells of `rect` owned by `id`.
    pub fn erase(&mut self, rect: Rect, id: u32) {
        for p in rect.cells() {
            if self.occupant(p) == Some(id) {
                self.cells.set(p.x as usize, p.y as usize, 0);
            }
        }
    }

    /// A local canvas over `rect` with foreign cells and its border ring
    /// blocked.
    pub fn canvas_for(&self, rect: Rect) -> Canvas {
        let mut canvas = Canvas::new(rect);
        for p in rect.cells() {
            if self.occupant(p) != Some(0) {
                canvas.mark(p, BLOCKED);
            }
        }
        canvas.block_border();
        canvas
    }

    /// Number of free rows or columns directly beyond `rect`'s edge in the
    /// given direction, stopping at the first occupied line or the map edge.
    pub fn slack(&self, rect: Rect, dir: Slack) -> i32 {
        let mut free = 0;
        loop {
            let k = free + 1;
            let line = match dir {
                Slack::Left => Rect::new(
                    Point::new(rect.start.x - k, rect.start.y),
                    Point::new(rect.start.x - k, rect.end.y),
                ),
                Slack::Right => Rect::new(
                    Point::new(rect.end.x + k, rect.start.y),
                    Point::new(rect.end.x + k, rect.end.y),
                ),
                Slack::Down => Rect::new(
                    Point::new(rect.start.x, rect.start.y - k),
                    Point::new(rect.end.x, rect.start.y - k),
                ),
                Slack::Up => Rect::new(
                    Point::new(rect.start.x, rect.end.y + k),
                    Point::new(rect.end.x, rect.end.y + k),
                ),
            };
            if !self.is_free(line, 0) {
                return free;
            }
            free = k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
        Rect::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn test_stamp_and_erase() {
        let mut map = CollisionMap::new(64);
        let a = rect(10, 10, 20, 20);
        map.stamp(a, 1);
        assert!(!map.is_free(a, 0));
        assert!(map.is_free(a, 1));
        assert!(map.is_free(rect(21, 10, 30, 20), 0));

        map.stamp(rect(20, 20, 25, 25), 2);
        map.erase(a, 1);
        assert_eq!(map.occupant(Point::new(10, 10)), Some(0));
        assert_eq!(map.occupant(Point::new(20, 20)), Some(2));
    }

    #[test]
    fn test_off_map_is_not_free() {
        let map = CollisionMap::new(64);
        assert!(!map.is_free(rect(-1, 0, 5, 5), 0));
        assert!(!map.is_free(rect(60, 60, 64, 63), 0));
    }

    #[test]
    fn test_slack() {
        let mut map = CollisionMap::new(64);
        let a = rect(20, 20, 30, 30);
        map.stamp(rect(40, 25, 45, 26), 5);
        assert_eq!(map.slack(a, Slack::Right), 9);
        assert_eq!(map.slack(a, Slack::Left), 20);
        assert_eq!(map.slack(a, Slack::Down), 20);
        assert_eq!(map.slack(a, Slack::Up), 33);
    }

    #[test]
    fn test_canvas_blocks_foreign_cells() {
        let mut map = CollisionMap::new(64);
        map.stamp(rect(0, 0, 12, 12), 3);
        let canvas = map.canvas_for(rect(10, 10, 30, 30));
        assert_eq!(canvas.occupant(Point::new(11, 11)), Some(BLOCKED));
        assert_eq!(canvas.occupant(Point::new(30, 20)), Some(BLOCKED));
        assert!(canvas.is_free(Point::new(20, 20)));
    }
}
