//! Serial placement jitter for finished base polygons.

use rand::Rng;
use tracing::debug;

use crate::config::ShapeParams;
use crate::geometry::Point;

use super::collision::{CollisionMap, Slack};
use super::shape::Shape;

/// Nudge `shape` by a random offset within the free space around its
/// footprint, first along y and then along x, and reserve the new
/// footprint. Returns the applied offset.
pub fn place<R: Rng>(
    shape: &mut Shape,
    collisions: &mut CollisionMap,
    halo: i32,
    params: &ShapeParams,
    rng: &mut R,
) -> Point {
    let side = collisions.side();
    collisions.erase(shape.footprint(halo), shape.id);

    let down = room(collisions.slack(shape.footprint(halo), Slack::Down), params);
    let up = room(collisions.slack(shape.footprint(halo), Slack::Up), params);
    let dy = rng.gen_range(-down..=up);
    shape.translate(Point::new(0, dy), side);

    let left = room(collisions.slack(shape.footprint(halo), Slack::Left), params);
    let right = room(collisions.slack(shape.footprint(halo), Slack::Right), params);
    let dx = rng.gen_range(-left..=right);
    shape.translate(Point::new(dx, 0), side);

    collisions.stamp(shape.footprint(halo), shape.id);
    debug!(shape = shape.id, dx, dy, rect = ?shape.rect, "placed shape");
    Point::new(dx, dy)
}

fn room(slack: i32, params: &ShapeParams) -> i32 {
    (slack - params.placement_margin).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(id: u32, x0: i32, y0: i32, s: i32) -> Shape {
        Shape::from_nodes(
            id,
            vec![
                Point::new(x0, y0),
                Point::new(x0, y0 + s),
                Point::new(x0 + s, y0 + s),
                Point::new(x0 + s, y0),
            ],
            256,
        )
    }

    #[test]
    fn test_room_keeps_margin() {
        let params = ShapeParams::default();
        assert_eq!(room(10, &params), 6);
        assert_eq!(room(3, &params), 0);
        assert_eq!(room(0, &params), 0);
    }

    #[test]
    fn test_place_stays_clear_of_neighbours() {
        let params = ShapeParams::default();
        let halo = 6;
        let mut collisions = CollisionMap::new(256);
        let mut a = square(1, 40, 40, 30);
        let b = square(2, 100, 40, 30);
        collisions.stamp(a.footprint(halo), 1);
        collisions.stamp(b.footprint(halo), 2);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..20 {
            place(&mut a, &mut collisions, halo, &params, &mut rng);
            assert!(a.footprint(halo).fits_map(256));
            assert!(!a.footprint(halo).intersects(&b.footprint(halo)));
            assert!(collisions.is_free(a.footprint(halo), 1));
            assert!(a.is_simple());
        }
    }

    #[test]
    fn test_boxed_in_shape_does_not_move() {
        let params = ShapeParams::default();
        let halo = 2;
        let mut collisions = CollisionMap::new(64);
        let mut a = square(1, 20, 20, 10);
        let fp = a.footprint(halo);
        collisions.stamp(fp.inflated(3), 9);
        collisions.erase(fp, 9);
        collisions.stamp(fp, 1);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let moved = place(&mut a, &mut collisions, halo, &params, &mut rng);
        assert_eq!(moved, Point::new(0, 0));
        assert_eq!(a.footprint(halo), fp);
    }
}
