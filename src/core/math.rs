//! Scalar type, constants and numeric helpers shared by the whole crate.
use std::ops::{Add, Mul, Sub};

#[cfg(feature = "float_as_double")]
mod float_mod {
    pub type Float = f64;
    pub mod consts {
        pub use std::f64::consts::*;
        pub const MACHINE_EPSILON: f64 = std::f64::EPSILON * 0.5;
    }
}
#[cfg(not(feature = "float_as_double"))]
mod float_mod {
    pub type Float = f32;
    pub mod consts {
        pub use std::f32::consts::*;
        pub const MACHINE_EPSILON: f32 = std::f32::EPSILON * 0.5;
    }
}

pub use float_mod::Float;
pub mod consts {
    use super::float_mod::Float;
    pub use super::float_mod::consts::*;
    pub const FRAC_PI_180: Float = PI / 180.0;
    pub const FRAC_180_PI: Float = 180.0 / PI;
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
S: num::One + Sub<S, Output = S> + Copy,
T: Add<T, Output = T> + Mul<S, Output = T>
{
    a * (S::one() - t) + b * t
}

/// Convert an angle from degrees into radians.
#[inline]
pub fn radians(deg: Float) -> Float {
    consts::FRAC_PI_180 * deg
}

/// Convert an angle from radians into degrees.
#[inline]
pub fn degrees(rad: Float) -> Float {
    consts::FRAC_180_PI * rad
}

/// `a * b - c * d` with an FMA-recovered rounding term, so the result
/// stays accurate when the two products nearly cancel.
#[inline]
pub fn difference_of_products(a: f64, b: f64, c: f64, d: f64) -> f64 {
    let cd = c * d;
    let diff = a.mul_add(b, -cd);
    let err = (-c).mul_add(d, cd);
    diff + err
}

/// Solve `a*t^2 + b*t + c = 0`, returning the roots with `t0 <= t1`.
///
/// The intermediate arithmetic runs in f64 and the discriminant uses
/// [`difference_of_products`] to survive catastrophic cancellation when
/// `b^2` is close to `4ac`. A vanishing `a` degenerates to the linear
/// root.
pub fn quadratic(a: Float, b: Float, c: Float) -> Option<(Float, Float)> {
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }
    let discrim = difference_of_products(b as f64, b as f64, 4.0 * a as f64, c as f64);
    if discrim < 0.0 {
        return None;
    }
    let root_discrim = discrim.sqrt();

    let q = if (b as f64) < 0.0 {
        -0.5 * (b as f64 - root_discrim)
    } else {
        -0.5 * (b as f64 + root_discrim)
    };
    let t0 = (q / a as f64) as Float;
    let t1 = (c as f64 / q) as Float;
    if t0 > t1 {
        Some((t1, t0))
    } else {
        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_root(a: Float, b: Float, c: Float, t: Float) {
        let residual = (a * t * t + b * t + c).abs();
        let scale = (a * t * t).abs().max((b * t).abs()).max(c.abs()).max(1.0);
        assert!(
            residual <= 1e-5 * scale,
            "root {} of {}t^2 + {}t + {} has residual {}",
            t, a, b, c, residual
        );
    }

    #[test]
    fn quadratic_roots_are_ordered_and_satisfy_equation() {
        let cases: [(Float, Float, Float); 5] = [
            (1.0, -3.0, 2.0),
            (2.0, 5.0, -3.0),
            (1.0, 0.0, -4.0),
            (4.0, 4.0, 1.0),
            (0.5, -1000.0, 0.25),
        ];
        for &(a, b, c) in cases.iter() {
            let (t0, t1) = quadratic(a, b, c).unwrap();
            assert!(t0 <= t1);
            assert_root(a, b, c, t0);
            assert_root(a, b, c, t1);
        }
    }

    #[test]
    fn quadratic_rejects_negative_discriminant() {
        assert!(quadratic(1.0, 0.0, 1.0).is_none());
        assert!(quadratic(0.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn quadratic_linear_degenerate() {
        let (t0, t1) = quadratic(0.0, 2.0, -4.0).unwrap();
        assert_eq!(t0, 2.0);
        assert_eq!(t1, 2.0);
    }

    #[test]
    fn quadratic_near_cancellation() {
        // b^2 and 4ac agree to many digits; the FMA path keeps the
        // discriminant from collapsing to a wrong sign.
        let a: Float = 1.0;
        let b: Float = -4000.0;
        let c: Float = 3999999.0;
        let (t0, t1) = quadratic(a, b, c).unwrap();
        assert_root(a, b, c, t0);
        assert_root(a, b, c, t1);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0 as Float, 2.0 as Float, 8.0), 2.0);
        assert_eq!(lerp(1.0 as Float, 2.0 as Float, 8.0), 8.0);
        assert_eq!(lerp(0.5 as Float, 2.0 as Float, 8.0), 5.0);
    }
}
