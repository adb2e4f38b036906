use std::collections::HashMap;

use crate::geometry::{Line, Point, Rect};
use crate::tilemap::Tilemap;

/// Bookkeeping from the walk that grew a shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkStats {
    /// Side transitions made before the lap completed
    pub side_switches: usize,
    /// Nodes placed while homing in on the start node
    pub closing_nodes: usize,
    pub fill_target: f32,
    /// Running average fill at the end of the walk
    pub mean_fill: f32,
    /// Rotation actually applied, in degrees (0 if it was rejected)
    pub rotation: f32,
}

/// One landmass: a closed base polygon, its refined coastline and its
/// elevation patch.
///
/// Each shape is owned by exactly one worker during the parallel phase.
#[derive(Clone, Debug)]
pub struct Shape {
    pub id: u32,
    /// Polygon vertices; the last connects back to the first
    pub nodes: Vec<Point>,
    /// `lines[i]` joins `nodes[i]` to `nodes[(i + 1) % n]`
    pub lines: Vec<Line>,
    /// Bounding box with a one-cell margin (base polygon, then contour)
    pub rect: Rect,
    pub contour: Vec<Point>,
    pub contour_closed: bool,
    /// Elevation over `rect`; zero outside the landmass
    pub patch: Tilemap<f32>,
    pub walk: WalkStats,
}

impl Shape {
    pub fn from_nodes(id: u32, nodes: Vec<Point>, map_side: usize) -> Self {
        let lines = close_polygon(&nodes);
        let rect = padded_bounds(&nodes, map_side);
        Self {
            id,
            nodes,
            lines,
            rect,
            contour: Vec::new(),
            contour_closed: false,
            patch: Tilemap::new(0, 0),
            walk: WalkStats::default(),
        }
    }

    /// Cells reserved for this shape in the collision map: its box grown
    /// by `halo` on every side.
    pub fn footprint(&self, halo: i32) -> Rect {
        self.rect.inflated(halo)
    }

    /// Copy rotated clockwise by `degrees` about the box center.
    pub fn rotated(&self, degrees: f32, map_side: usize) -> Shape {
        let center = self.rect.center();
        let nodes = self
            .nodes
            .iter()
            .map(|p| p.rotated_about(center, degrees, map_side))
            .collect();
        let mut shape = Shape::from_nodes(self.id, nodes, map_side);
        shape.walk = self.walk.clone();
        shape
    }

    /// Shift the base polygon by `by`. Lines and box are rebuilt.
    pub fn translate(&mut self, by: Point, map_side: usize) {
        for node in &mut self.nodes {
            *node = (*node + by).clamped(map_side);
        }
        self.lines = close_polygon(&self.nodes);
        self.rect = padded_bounds(&self.nodes, map_side);
    }

    /// No two non-adjacent edges share a cell.
    pub fn is_simple(&self) -> bool {
        let n = self.lines.len();
        if n < 3 {
            return false;
        }
        let mut owners: HashMap<Point, Vec<usize>> = HashMap::new();
        for (i, line) in self.lines.iter().enumerate() {
            for &p in line.points() {
                let edges = owners.entry(p).or_default();
                let clash = edges.iter().any(|&j| {
                    let gap = (i + n - j) % n;
                    gap != 0 && gap != 1 && gap != n - 1
                });
                if clash {
                    return false;
                }
                if !edges.contains(&i) {
                    edges.push(i);
                }
            }
        }
        true
    }

    /// The base polygon as one cyclic 4-connected path, starting at the
    /// first node.
    pub fn base_path(&self) -> Vec<Point> {
        let mut path: Vec<Point> = Vec::new();
        for line in &self.lines {
            let pts = line.points();
            for &p in &pts[..pts.len().saturating_sub(1)] {
                if path.last() != Some(&p) {
                    path.push(p);
                }
            }
        }
        if path.len() > 1 && path.first() == path.last() {
            path.pop();
        }
        path
    }

    /// Cells of the filled patch above zero.
    pub fn land_cells(&self) -> usize {
        self.patch.count_above(0.0)
    }
}

fn close_polygon(nodes: &[Point]) -> Vec<Line> {
    let n = nodes.len();
    (0..n).map(|i| Line::new(nodes[i], nodes[(i + 1) % n])).collect()
}

fn padded_bounds(points: &[Point], map_side: usize) -> Rect {
    Rect::bounding(points)
        .map(|r| r.inflated(1).clamped(map_side))
        .unwrap_or(Rect::new(Point::new(0, 0), Point::new(0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i32, y0: i32, s: i32) -> Shape {
        Shape::from_nodes(
            1,
            vec![
                Point::new(x0, y0),
                Point::new(x0, y0 + s),
                Point::new(x0 + s, y0 + s),
                Point::new(x0 + s, y0),
            ],
            128,
        )
    }

    #[test]
    fn test_square_is_simple() {
        let shape = square(10, 10, 20);
        assert!(shape.is_simple());
        assert_eq!(shape.rect, Rect::new(Point::new(9, 9), Point::new(31, 31)));
    }

    #[test]
    fn test_bowtie_is_not_simple() {
        let shape = Shape::from_nodes(
            1,
            vec![
                Point::new(10, 10),
                Point::new(30, 30),
                Point::new(30, 10),
                Point::new(10, 30),
            ],
            128,
        );
        assert!(!shape.is_simple());
    }

    #[test]
    fn test_base_path_is_closed_and_connected() {
        let shape = square(10, 10, 20);
        let path = shape.base_path();
        assert_eq!(path.len(), 80);
        assert_eq!(path[0], Point::new(10, 10));
        for i in 0..path.len() {
            let next = path[(i + 1) % path.len()];
            assert_eq!(path[i].steps(next), 1);
        }
    }

    #[test]
    fn test_rotation_keeps_size() {
        let shape = square(40, 40, 20);
        let turned = shape.rotated(90.0, 128);
        assert_eq!(turned.nodes.len(), 4);
        assert_eq!(turned.rect.width(), shape.rect.width());
        assert!(turned.is_simple());
    }

    #[test]
    fn test_translate() {
        let mut shape = square(10, 10, 20);
        shape.translate(Point::new(5, -3), 128);
        assert_eq!(shape.nodes[0], Point::new(15, 7));
        assert_eq!(shape.rect.start, Point::new(14, 6));
        assert_eq!(shape.lines[0].origin(), Point::new(15, 7));
    }
}
