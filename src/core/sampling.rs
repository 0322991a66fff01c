//! Mappings from canonical uniform samples to sampling domains.
use crate::core::math::consts::{FRAC_PI_2, FRAC_PI_4};
use crate::core::math::Float;
use super::geometry::{Point2f, Vector2f};

/// Map a uniform sample on the unit square to the unit disk, preserving
/// relative areas. Avoids the clumping at the disk center that the naive
/// polar mapping produces.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2
    let u_offset = *u * 2.0 - Vector2f{x: 1.0, y: 1.0};

    // Handle degeneracy at the origin
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::default();
    }

    // Apply concentric mapping to point
    let theta: Float;
    let r: Float;
    if u_offset.x.abs() > u_offset.y.abs() {
        r = u_offset.x;
        theta = FRAC_PI_4 * (u_offset.y / u_offset.x);
    } else {
        r = u_offset.y;
        theta = FRAC_PI_2 - FRAC_PI_4 * (u_offset.x / u_offset.y);
    }
    Point2f{x: theta.cos(), y: theta.sin()} * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    #[test]
    fn center_maps_to_origin() {
        assert_eq!(concentric_sample_disk(&Point2f::new(0.5, 0.5)), Point2f::default());
    }

    #[test]
    fn stays_on_the_unit_disk() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
            let p = concentric_sample_disk(&u);
            assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn corners_map_to_the_rim() {
        for u in &[Point2f::new(0.0, 0.5), Point2f::new(1.0, 0.5),
                   Point2f::new(0.5, 0.0), Point2f::new(0.5, 1.0)] {
            let p = concentric_sample_disk(u);
            let r2 = p.x * p.x + p.y * p.y;
            assert!((r2 - 1.0).abs() < 1e-5, "sample {:?} -> {:?}", u, p);
        }
    }
}
