use std::ops::Mul;
use crate::core::math::{radians, Float};
use super::geometry::{Point3f, Ray, Vector3f};
use super::matrix::Matrix4x4;

/// An affine transform with its cached inverse.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t00: Float, t01: Float, t02: Float, t03: Float,
        t10: Float, t11: Float, t12: Float, t13: Float,
        t20: Float, t21: Float, t22: Float, t23: Float,
        t30: Float, t31: Float, t32: Float, t33: Float
    ) -> Transform {
        let m = Matrix4x4::new(t00, t01, t02, t03, t10, t11, t12, t13,
            t20, t21, t22, t23, t30, t31, t32, t33);
        Transform{
            m,
            m_inv: m.inverse()
        }
    }

    /// Return the inverse of this Transform.
    #[inline]
    pub fn inverse(&self) -> Transform {
        Transform{
            m: self.m_inv,
            m_inv: self.m
        }
    }

    /// Test if this Transform is the identity transformation.
    pub fn is_identity(&self) -> bool {
        self.m == Matrix4x4::default()
    }

    /// Create a Transform representing a translation.
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform{
            m: Matrix4x4::new(1.0, 0.0, 0.0, delta.x,
                0.0, 1.0, 0.0, delta.y,
                0.0, 0.0, 1.0, delta.z,
                0.0, 0.0, 0.0, 1.0),
            m_inv: Matrix4x4::new(1.0, 0.0, 0.0, -delta.x,
                0.0, 1.0, 0.0, -delta.y,
                0.0, 0.0, 1.0, -delta.z,
                0.0, 0.0, 0.0, 1.0)
        }
    }

    /// Create a Transform that represents a scale.
    pub fn scale(x: Float, y: Float, z: Float) -> Transform {
        Transform{
            m: Matrix4x4::new(x, 0.0, 0.0, 0.0,
                0.0, y, 0.0, 0.0,
                0.0, 0.0, z, 0.0,
                0.0, 0.0, 0.0, 1.0),
            m_inv: Matrix4x4::new(1.0 / x, 0.0, 0.0, 0.0,
                0.0, 1.0 / y, 0.0, 0.0,
                0.0, 0.0, 1.0 / z, 0.0,
                0.0, 0.0, 0.0, 1.0)
        }
    }

    /// Create a Transform rotating around the X axis, angle in degrees.
    pub fn rotate_x(theta: Float) -> Transform {
        let theta = radians(theta);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cos_theta, -sin_theta, 0.0,
            0.0, sin_theta, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        Transform{
            m,
            m_inv: m.transpose()
        }
    }

    /// Create a Transform rotating around the Y axis, angle in degrees.
    pub fn rotate_y(theta: Float) -> Transform {
        let theta = radians(theta);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, 0.0, sin_theta, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -sin_theta, 0.0, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        Transform{
            m,
            m_inv: m.transpose()
        }
    }

    /// Create a Transform rotating around the Z axis, angle in degrees.
    pub fn rotate_z(theta: Float) -> Transform {
        let theta = radians(theta);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0,
            sin_theta, cos_theta, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0
        );
        Transform{
            m,
            m_inv: m.transpose()
        }
    }

    /// Create a camera-to-world transform placing the camera at `pos`,
    /// looking at `look`, with `up` fixing the roll.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Transform {
        let mut camera_to_world = Matrix4x4::default();
        camera_to_world.m[0][3] = pos.x;
        camera_to_world.m[1][3] = pos.y;
        camera_to_world.m[2][3] = pos.z;

        let dir = (*look - *pos).normalize();
        let right = up.normalize().cross(&dir).normalize();
        let new_up = dir.cross(&right);
        camera_to_world.m[0][0] = right.x;
        camera_to_world.m[1][0] = right.y;
        camera_to_world.m[2][0] = right.z;
        camera_to_world.m[0][1] = new_up.x;
        camera_to_world.m[1][1] = new_up.y;
        camera_to_world.m[2][1] = new_up.z;
        camera_to_world.m[0][2] = dir.x;
        camera_to_world.m[1][2] = dir.y;
        camera_to_world.m[2][2] = dir.z;
        Transform{
            m: camera_to_world,
            m_inv: camera_to_world.inverse()
        }
    }

    /// Transform a given Point3f.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let x = self.m.m[0][0] * p.x + self.m.m[0][1] * p.y + self.m.m[0][2] * p.z + self.m.m[0][3];
        let y = self.m.m[1][0] * p.x + self.m.m[1][1] * p.y + self.m.m[1][2] * p.z + self.m.m[1][3];
        let z = self.m.m[2][0] * p.x + self.m.m[2][1] * p.y + self.m.m[2][2] * p.z + self.m.m[2][3];
        let w = self.m.m[3][0] * p.x + self.m.m[3][1] * p.y + self.m.m[3][2] * p.z + self.m.m[3][3];
        if w == 1.0 {
            Point3f::new(x, y, z)
        } else {
            Point3f::new(x / w, y / w, z / w)
        }
    }

    /// Transform a given Vector3f.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        Vector3f{
            x: self.m.m[0][0] * v.x + self.m.m[0][1] * v.y + self.m.m[0][2] * v.z,
            y: self.m.m[1][0] * v.x + self.m.m[1][1] * v.y + self.m.m[1][2] * v.z,
            z: self.m.m[2][0] * v.x + self.m.m[2][1] * v.y + self.m.m[2][2] * v.z
        }
    }

    /// Transform a Ray, preserving its time.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        Ray{
            o: self.transform_point(&r.o),
            d: self.transform_vector(&r.d),
            time: r.time
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform{
            m: self.m.mul(&rhs.m),
            m_inv: rhs.m_inv.mul(&self.m_inv)
        }
    }
}
