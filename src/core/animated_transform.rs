use crate::core::math::{lerp, Float};
use super::geometry::{Point3f, Ray, Vector3f};
use super::matrix::Matrix4x4;
use super::quaternion::Quaternion;
use super::transform::Transform;

/// A camera-to-world transform interpolated between two keyframes.
///
/// The endpoints are decomposed into translate/rotate/scale so rotation
/// interpolates over the sphere instead of through the matrix entries.
/// Outside `[start_time, end_time]` the endpoint transforms apply.
#[derive(Debug, Copy, Clone)]
pub struct AnimatedTransform {
    start_transform: Transform,
    end_transform: Transform,
    start_time: Float,
    end_time: Float,
    actually_animated: bool,
    t: [Vector3f; 2],
    r: [Quaternion; 2],
    s: [Matrix4x4; 2]
}

impl AnimatedTransform {
    pub fn new(
        start_transform: &Transform,
        start_time: Float,
        end_transform: &Transform,
        end_time: Float
    ) -> AnimatedTransform {
        let mut at = AnimatedTransform{
            start_transform: *start_transform,
            end_transform: *end_transform,
            start_time,
            end_time,
            actually_animated: *start_transform != *end_transform,
            t: [Vector3f::default(); 2],
            r: [Quaternion::default(); 2],
            s: [Matrix4x4::default(); 2]
        };
        let (t0, r0, s0) = AnimatedTransform::decompose(&start_transform.m);
        let (t1, r1, s1) = AnimatedTransform::decompose(&end_transform.m);
        at.t = [t0, t1];
        at.r = [r0, r1];
        at.s = [s0, s1];
        // flip the second quaternion if needed to take the shortest path
        if at.r[0].dot(&at.r[1]) < 0.0 {
            at.r[1] = -at.r[1];
        }
        at
    }

    /// Wrap a single static transform.
    pub fn from_transform(t: &Transform) -> AnimatedTransform {
        AnimatedTransform::new(t, 0.0, t, 1.0)
    }

    pub fn is_animated(&self) -> bool {
        self.actually_animated
    }

    /// Decompose a matrix into translation, rotation and scale. The
    /// rotation is extracted by polar iteration, the scale is whatever
    /// remains once the rotation is factored out.
    pub fn decompose(m: &Matrix4x4) -> (Vector3f, Quaternion, Matrix4x4) {
        let t = Vector3f::new(m.m[0][3], m.m[1][3], m.m[2][3]);

        // Strip the translation before extracting the rotation.
        let mut matrix = *m;
        for i in 0..3 {
            matrix.m[i][3] = 0.0;
            matrix.m[3][i] = 0.0;
        }
        matrix.m[3][3] = 1.0;

        let mut rot = matrix;
        for _ in 0..100 {
            // Average the matrix with its inverse transpose; converges to
            // the rotation factor.
            let mut rnext = Matrix4x4::default();
            let rit = rot.transpose().inverse();
            for i in 0..4 {
                for j in 0..4 {
                    rnext.m[i][j] = 0.5 * (rot.m[i][j] + rit.m[i][j]);
                }
            }
            let mut norm: Float = 0.0;
            for i in 0..3 {
                let n = (rot.m[i][0] - rnext.m[i][0]).abs() +
                        (rot.m[i][1] - rnext.m[i][1]).abs() +
                        (rot.m[i][2] - rnext.m[i][2]).abs();
                norm = norm.max(n);
            }
            rot = rnext;
            if norm <= 0.0001 {
                break;
            }
        }
        let r: Quaternion = Transform{
            m: rot,
            m_inv: rot.inverse()
        }.into();

        let s = rot.inverse().mul(&matrix);
        (t, r, s)
    }

    /// Calculates the interpolated Transform at a given time.
    pub fn interpolate(&self, time: Float) -> Transform {
        // Boundary conditions for matrix interpolation
        if !self.actually_animated || time <= self.start_time {
            return self.start_transform;
        }
        if time >= self.end_time {
            return self.end_transform;
        }
        let dt = (time - self.start_time) / (self.end_time - self.start_time);
        let trans = self.t[0] * (1.0 - dt) + self.t[1] * dt;
        let rotate = self.r[0].slerp(&self.r[1], dt);
        let mut scale = Matrix4x4::default();
        for i in 0..3 {
            for j in 0..3 {
                scale.m[i][j] = lerp(dt, self.s[0].m[i][j], self.s[1].m[i][j]);
            }
        }
        let scale = Transform{
            m: scale,
            m_inv: scale.inverse()
        };
        Transform::translate(&trans) * Transform::from(rotate) * scale
    }

    /// Transform a Ray at the interpolated transform for its time.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        if !self.actually_animated || r.time <= self.start_time {
            self.start_transform.transform_ray(r)
        } else if r.time >= self.end_time {
            self.end_transform.transform_ray(r)
        } else {
            self.interpolate(r.time).transform_ray(r)
        }
    }

    /// Transform a Point3f at the interpolated transform for the given time.
    pub fn transform_point(&self, time: Float, p: &Point3f) -> Point3f {
        if !self.actually_animated || time <= self.start_time {
            self.start_transform.transform_point(p)
        } else if time >= self.end_time {
            self.end_transform.transform_point(p)
        } else {
            self.interpolate(time).transform_point(p)
        }
    }

    /// Transform a Vector3f at the interpolated transform for the given time.
    pub fn transform_vector(&self, time: Float, v: &Vector3f) -> Vector3f {
        if !self.actually_animated || time <= self.start_time {
            self.start_transform.transform_vector(v)
        } else if time >= self.end_time {
            self.end_transform.transform_vector(v)
        } else {
            self.interpolate(time).transform_vector(v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_transform_ignores_time() {
        let t = Transform::translate(&Vector3f::new(1.0, 0.0, 0.0));
        let at = AnimatedTransform::from_transform(&t);
        assert!(!at.is_animated());
        let p = Point3f::zero();
        assert_eq!(at.transform_point(0.0, &p), at.transform_point(0.7, &p));
    }

    #[test]
    fn interpolation_hits_endpoints() {
        let start = Transform::translate(&Vector3f::new(0.0, 0.0, 0.0));
        let end = Transform::translate(&Vector3f::new(2.0, 0.0, 0.0));
        let at = AnimatedTransform::new(&start, 0.0, &end, 1.0);
        assert!(at.is_animated());
        let p = Point3f::zero();
        assert_eq!(at.transform_point(0.0, &p), Point3f::zero());
        assert_eq!(at.transform_point(1.0, &p), Point3f::new(2.0, 0.0, 0.0));
        let mid = at.transform_point(0.5, &p);
        assert!((mid.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_interpolates_over_the_arc() {
        let start = Transform::rotate_y(0.0);
        let end = Transform::rotate_y(90.0);
        let at = AnimatedTransform::new(&start, 0.0, &end, 1.0);
        let v = Vector3f::new(0.0, 0.0, 1.0);
        let mid = at.transform_vector(0.5, &v);
        // Halfway through a 90 degree yaw the direction is 45 degrees off.
        assert!((mid.length() - 1.0).abs() < 1e-4);
        let expected = Transform::rotate_y(45.0).transform_vector(&v);
        assert!((mid - expected).length() < 1e-3);
    }
}
