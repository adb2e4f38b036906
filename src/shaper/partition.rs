//! Region partitioning
//!
//! Splits the map interior into a near-square grid with one cell per
//! requested landmass, then carves a randomly sized and placed region out of
//! each cell. Region sizes share a running land-area budget so that later
//! regions make up for earlier ones.

use rand::Rng;

use crate::config::ShapeParams;
use crate::geometry::{Point, Rect};

/// A placement slot for one landmass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Shape id, starting at 1
    pub id: u32,
    pub rect: Rect,
    /// Grid cell the region was carved from
    pub cell: Rect,
}

/// Regions in creation order, handed out one at a time.
#[derive(Clone, Debug)]
pub struct RegionPartitioner {
    regions: Vec<Region>,
    next: usize,
}

impl RegionPartitioner {
    /// Largest shape count a map of this size supports.
    pub fn max_regions(map_size: usize, params: &ShapeParams) -> usize {
        let min = params.min_region_size.max(1);
        (map_size * map_size) / (min * min)
    }

    pub fn new<R: Rng>(
        map_size: usize,
        shape_count: usize,
        coverage: f32,
        params: &ShapeParams,
        rng: &mut R,
    ) -> Self {
        let count = shape_count.min(Self::max_regions(map_size, params));
        let border = params.grid_border as i32;
        let grid_side = map_size as i32 - 2 * border;
        if count == 0 || grid_side <= 0 {
            return Self {
                regions: Vec::new(),
                next: 0,
            };
        }

        let cells = grid_cells(count, grid_side, border);

        let mut land_area = (grid_side as f64 * grid_side as f64 * coverage as f64).ceil() as i64;
        let mut average = land_area / count as i64;
        let min_ratio = 1.0 / params.max_side_ratio;

        let mut regions = Vec::with_capacity(count);
        for (i, cell) in cells.into_iter().enumerate() {
            let area = average as f32 * rng.gen_range(0.8..=1.2f32);
            let ratio = rng.gen_range(min_ratio..=params.max_side_ratio);
            let width = ((area / ratio).sqrt() as i32).clamp(0, cell.width());
            let height = ((width as f32 * ratio) as i32).clamp(0, cell.height());

            let offset = Point::new(
                rng.gen_range(0..=cell.width() - width),
                rng.gen_range(0..=cell.height() - height),
            );
            let start = cell.start + offset;
            let rect = Rect::new(start, start + Point::new(width, height));

            land_area = (land_area - (width * height) as i64).max(0);
            let remaining = (count - i - 1).max(1) as i64;
            average = land_area / remaining;

            regions.push(Region {
                id: i as u32 + 1,
                rect,
                cell,
            });
        }

        Self { regions, next: 0 }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Iterator for RegionPartitioner {
    type Item = Region;

    /// The next region in creation order; `None` once all are handed out.
    fn next(&mut self) -> Option<Region> {
        let region = self.regions.get(self.next).copied()?;
        self.next += 1;
        Some(region)
    }
}

/// Lay out `count` grid cells over a `grid_side` square offset by `border`.
///
/// Uses `floor(√n)` rows of `ceil(√n)` columns; the remainder (never more
/// than one column per row) is spread over a band of central rows.
fn grid_cells(count: usize, grid_side: i32, border: i32) -> Vec<Rect> {
    let root = (count as f64).sqrt();
    let rows = (root.floor() as usize).max(1);
    let cols = root.ceil() as usize;
    let diff = count as i64 - (rows * cols) as i64;
    let band = diff.unsigned_abs() as usize;
    let band_start = (rows - band) / 2;

    let row_height = grid_side / rows as i32;
    let mut cells = Vec::with_capacity(count);
    for row in 0..rows {
        let mut n = cols as i64;
        if (band_start..band_start + band).contains(&row) {
            n += diff.signum();
        }
        let col_width = grid_side / n as i32;
        for col in 0..n as i32 {
            let start = Point::new(border + col_width * col, border + row_height * row as i32);
            cells.push(Rect::new(
                start,
                start + Point::new(col_width - 1, row_height - 1),
            ));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_cell_counts() {
        for count in 1..=40 {
            let cells = grid_cells(count, 448, 32);
            assert_eq!(cells.len(), count, "count {}", count);
        }
    }

    #[test]
    fn test_regions_inside_cells_and_disjoint() {
        let params = ShapeParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for &(count, coverage) in &[(1, 0.5), (4, 0.6), (7, 0.9), (12, 1.0), (5, 0.1)] {
            let partitioner = RegionPartitioner::new(512, count, coverage, &params, &mut rng);
            let regions = partitioner.regions();
            assert_eq!(regions.len(), count);
            for (i, a) in regions.iter().enumerate() {
                assert_eq!(a.id, i as u32 + 1);
                assert!(a.cell.contains_rect(&a.rect), "{:?} not in {:?}", a.rect, a.cell);
                assert!(a.rect.fits_map(512));
                for b in &regions[i + 1..] {
                    assert!(!a.rect.intersects(&b.rect));
                }
            }
        }
    }

    #[test]
    fn test_count_is_clamped() {
        let params = ShapeParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let max = RegionPartitioner::max_regions(256, &params);
        assert_eq!(max, 16);
        let partitioner = RegionPartitioner::new(256, 500, 0.5, &params, &mut rng);
        assert!(partitioner.len() <= max);
        assert_eq!(partitioner.count(), max);
    }

    #[test]
    fn test_hands_out_in_order_then_stops() {
        let params = ShapeParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut partitioner = RegionPartitioner::new(256, 3, 0.5, &params, &mut rng);
        assert_eq!(partitioner.next().map(|r| r.id), Some(1));
        assert_eq!(partitioner.next().map(|r| r.id), Some(2));
        assert_eq!(partitioner.next().map(|r| r.id), Some(3));
        assert!(partitioner.next().is_none());
        assert!(partitioner.next().is_none());
    }

    #[test]
    fn test_land_budget_tracks_coverage() {
        let params = ShapeParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let partitioner = RegionPartitioner::new(512, 9, 0.4, &params, &mut rng);
        let area: i32 = partitioner.regions().iter().map(|r| r.rect.area()).sum();
        let target = 448.0 * 448.0 * 0.4;
        assert!((area as f32) < target * 1.25, "area {} vs target {}", area, target);
        assert!((area as f32) > target * 0.6, "area {} vs target {}", area, target);
    }
}
