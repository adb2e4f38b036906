use crate::tilemap::Tilemap;

use super::{Point, Rect};

/// Occupant value for cells no shape owns but the walk must not cross
/// (canvas borders, limiter bands, foreign footprints).
pub const BLOCKED: u32 = u32::MAX;

/// Collision raster local to one rect, addressed in map space.
///
/// `0` is free; any other value is an owner id or [`BLOCKED`].
#[derive(Clone, Debug)]
pub struct Canvas {
    rect: Rect,
    cells: Tilemap<u32>,
}

impl Canvas {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cells: Tilemap::new(rect.cols(), rect.rows()),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Owner of a map-space cell, `None` if it lies off the canvas.
    pub fn occupant(&self, p: Point) -> Option<u32> {
        let local = self.rect.to_local(p);
        self.cells.try_get(local.x, local.y).copied()
    }

    /// Free cells are on the canvas and unowned.
    pub fn is_free(&self, p: Point) -> bool {
        self.occupant(p) == Some(0)
    }

    /// Set the owner of a map-space cell. Off-canvas cells are ignored.
    pub fn mark(&mut self, p: Point, id: u32) {
        let local = self.rect.to_local(p);
        self.cells.try_set(local.x, local.y, id);
    }

    /// Block the outermost ring of cells.
    pub fn block_border(&mut self) {
        let (w, h) = (self.cells.width, self.cells.height);
        for x in 0..w {
            self.cells.set(x, 0, BLOCKED);
            self.cells.set(x, h - 1, BLOCKED);
        }
        for y in 0..h {
            self.cells.set(0, y, BLOCKED);
            self.cells.set(w - 1, y, BLOCKED);
        }
    }

    /// Block the outline of `outline` (map space), clipped to the canvas.
    pub fn block_outline(&mut self, outline: Rect) {
        for x in outline.start.x..=outline.end.x {
            self.mark(Point::new(x, outline.start.y), BLOCKED);
            self.mark(Point::new(x, outline.end.y), BLOCKED);
        }
        for y in outline.start.y..=outline.end.y {
            self.mark(Point::new(outline.start.x, y), BLOCKED);
            self.mark(Point::new(outline.end.x, y), BLOCKED);
        }
    }

    /// Map-space cells owned by `id`.
    pub fn cells_owned_by(&self, id: u32) -> impl Iterator<Item = Point> + '_ {
        let origin = self.rect.start;
        self.cells
            .iter()
            .filter(move |(_, _, &v)| v == id)
            .map(move |(x, y, _)| Point::new(origin.x + x as i32, origin.y + y as i32))
    }
}
