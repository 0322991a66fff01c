use std::ops::Neg;
use crate::core::math::{lerp, Float};
use super::matrix::Matrix4x4;
use super::transform::Transform;

/// A rotation quaternion `w + xi + yj + zk`, kept unit length.
///
/// This carries exactly what keyframe interpolation needs: spherical
/// interpolation between two rotations and conversions to and from
/// rotation transforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub x: Float,
    pub y: Float,
    pub z: Float,
    pub w: Float
}

impl Quaternion {
    pub fn new(x: Float, y: Float, z: Float, w: Float) -> Quaternion {
        Quaternion{x, y, z, w}
    }

    /// Calculate the dot product between this Quaternion and another.
    pub fn dot(&self, q: &Quaternion) -> Float {
        self.x * q.x + self.y * q.y + self.z * q.z + self.w * q.w
    }

    /// Normalize this Quaternion.
    pub fn normalize(&self) -> Quaternion {
        let inv = 1.0 / self.dot(self).sqrt();
        Quaternion{
            x: self.x * inv,
            y: self.y * inv,
            z: self.z * inv,
            w: self.w * inv
        }
    }

    /// Interpolate between two rotations along the great arc joining them.
    pub fn slerp(&self, q2: &Quaternion, t: Float) -> Quaternion {
        let cos_theta = self.dot(q2);
        if cos_theta > 0.9995 {
            // Nearly parallel rotations: an ordinary lerp, renormalized,
            // is accurate and avoids the unstable arc construction.
            Quaternion{
                x: lerp(t, self.x, q2.x),
                y: lerp(t, self.y, q2.y),
                z: lerp(t, self.z, q2.z),
                w: lerp(t, self.w, q2.w)
            }.normalize()
        } else {
            let theta: Float = num::clamp(cos_theta, -1.0, 1.0).acos();
            let thetap = theta * t;
            // Orthogonalize q2 against self; the pair spans the arc plane.
            let qperp = Quaternion{
                x: q2.x - self.x * cos_theta,
                y: q2.y - self.y * cos_theta,
                z: q2.z - self.z * cos_theta,
                w: q2.w - self.w * cos_theta
            }.normalize();
            let (sin_p, cos_p) = thetap.sin_cos();
            Quaternion{
                x: self.x * cos_p + qperp.x * sin_p,
                y: self.y * cos_p + qperp.y * sin_p,
                z: self.z * cos_p + qperp.z * sin_p,
                w: self.w * cos_p + qperp.w * sin_p
            }
        }
    }
}

/// The identity rotation.
impl Default for Quaternion {
    fn default() -> Quaternion {
        Quaternion{x: 0.0, y: 0.0, z: 0.0, w: 1.0}
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;
    fn neg(self) -> Quaternion {
        Quaternion{
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w
        }
    }
}

impl From<Quaternion> for Transform {
    fn from(q: Quaternion) -> Transform {
        let Quaternion{x, y, z, w} = q;
        let m = Matrix4x4::new(
            1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - w * z), 2.0 * (x * z + w * y), 0.0,
            2.0 * (x * y + w * z), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - w * x), 0.0,
            2.0 * (x * z - w * y), 2.0 * (y * z + w * x), 1.0 - 2.0 * (x * x + y * y), 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        // A rotation's inverse is its transpose.
        Transform{
            m,
            m_inv: m.transpose()
        }
    }
}

impl From<Transform> for Quaternion {
    fn from(t: Transform) -> Quaternion {
        let m = &t.m.m;
        let trace = m[0][0] + m[1][1] + m[2][2];
        if trace > 0.0 {
            // The scalar part dominates; recover it from the trace and the
            // vector part from the antisymmetric entries.
            let s = (trace + 1.0).sqrt();
            let k = 0.5 / s;
            Quaternion::new(
                (m[2][1] - m[1][2]) * k,
                (m[0][2] - m[2][0]) * k,
                (m[1][0] - m[0][1]) * k,
                0.5 * s
            )
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = ((m[0][0] - (m[1][1] + m[2][2])) + 1.0).sqrt();
            let k = if s != 0.0 { 0.5 / s } else { 0.0 };
            Quaternion::new(
                0.5 * s,
                (m[1][0] + m[0][1]) * k,
                (m[2][0] + m[0][2]) * k,
                (m[2][1] - m[1][2]) * k
            )
        } else if m[1][1] > m[2][2] {
            let s = ((m[1][1] - (m[2][2] + m[0][0])) + 1.0).sqrt();
            let k = if s != 0.0 { 0.5 / s } else { 0.0 };
            Quaternion::new(
                (m[0][1] + m[1][0]) * k,
                0.5 * s,
                (m[2][1] + m[1][2]) * k,
                (m[0][2] - m[2][0]) * k
            )
        } else {
            let s = ((m[2][2] - (m[0][0] + m[1][1])) + 1.0).sqrt();
            let k = if s != 0.0 { 0.5 / s } else { 0.0 };
            Quaternion::new(
                (m[0][2] + m[2][0]) * k,
                (m[1][2] + m[2][1]) * k,
                0.5 * s,
                (m[1][0] - m[0][1]) * k
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_survives_transform_round_trip() {
        for t in &[Transform::rotate_x(165.0), Transform::rotate_y(40.0), Transform::rotate_z(-120.0)] {
            let q: Quaternion = (*t).into();
            let back: Transform = q.into();
            for i in 0..3 {
                for j in 0..3 {
                    assert!((back.m.m[i][j] - t.m.m[i][j]).abs() < 1e-5,
                        "entry ({}, {})", i, j);
                }
            }
        }
    }

    #[test]
    fn extraction_yields_a_unit_quaternion() {
        let q: Quaternion = Transform::rotate_x(170.0).into();
        assert!((q.dot(&q) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn slerp_endpoints_match_inputs() {
        let qa: Quaternion = Transform::rotate_z(0.0).into();
        let qb: Quaternion = Transform::rotate_z(90.0).into();
        let start = qa.slerp(&qb, 0.0);
        let end = qa.slerp(&qb, 1.0);
        assert!((start.dot(&qa).abs() - 1.0).abs() < 1e-5);
        assert!((end.dot(&qb).abs() - 1.0).abs() < 1e-5);
    }
}
