//! Geometric optics helpers.
use crate::core::math::Float;
use super::geometry::{Normal3f, Vector3f};

/// Refract `wi` about the interface with normal `n`, where `eta` is the
/// ratio of the transmitted to the incident index of refraction.
///
/// `wi` points away from the surface. When `wi` arrives from the far side
/// of `n` the interface is flipped so callers do not need to orient the
/// normal themselves. Returns `None` on total internal reflection.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    let mut eta = eta;
    let mut n = *n;
    let mut cos_theta_i = n.dot_vec(wi);
    if cos_theta_i < 0.0 {
        eta = 1.0 / eta;
        cos_theta_i = -cos_theta_i;
        n = -n;
    }

    // Compute cos theta_t using Snell's law
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = sin2_theta_i / (eta * eta);
    // Handle total internal reflection
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).max(0.0).sqrt();

    Some(-*wi / eta + Vector3f::from(n) * (cos_theta_i / eta - cos_theta_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Float;

    fn sin_against(v: &Vector3f, n: &Normal3f) -> Float {
        // |sin| of the angle between v and the normal axis.
        let v = v.normalize();
        let cos = v.dot(&Vector3f::from(*n));
        (1.0 - cos * cos).max(0.0).sqrt()
    }

    #[test]
    fn snells_law_holds() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let (eta_i, eta_t): (Float, Float) = (1.0, 1.5);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let wt = refract(&wi, &n, eta_t / eta_i).unwrap();
        let sin_i = sin_against(&wi, &n);
        let sin_t = sin_against(&wt, &n);
        assert!((eta_i * sin_i - eta_t * sin_t).abs() < 1e-6);
        // Transmitted ray continues into the opposite hemisphere.
        assert!(wt.z < 0.0);
    }

    #[test]
    fn flipped_interface_is_handled() {
        // Incident direction arriving from the -z side of the normal.
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.3, 0.0, -0.9539392);
        let wt = refract(&wi, &n, 1.5).unwrap();
        assert!(wt.z > 0.0);
        let sin_i = sin_against(&wi, &n);
        let sin_t = sin_against(&wt, &n);
        // The flip inverts the ratio: going from the far side the ray
        // leaves the denser medium.
        assert!((1.5 * sin_i - sin_t).abs() < 1e-5);
    }

    #[test]
    fn total_internal_reflection_fails() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        // Grazing exit from glass to air.
        let wi = Vector3f::new(0.9, 0.0, 0.43588989);
        assert!(refract(&wi, &n, 1.0 / 1.5).is_none());
    }

    #[test]
    fn normal_incidence_passes_straight_through() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let wt = refract(&wi, &n, 1.5).unwrap();
        assert!((wt - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }
}
