use std::fmt;
use crate::core::math::Float;
use super::{Point3f, Vector3f};

/// A ray with an associated time used to interpolate animated transforms.
///
/// The direction is not required to be unit length; the lens tracer works
/// with unnormalized directions and camera rays are normalized on egress.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub time: Float
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Ray {
        Ray{
            o,
            d,
            time: 0.0
        }
    }

    pub fn with_time(o: Point3f, d: Vector3f, time: Float) -> Ray {
        Ray{o, d, time}
    }

    /// Return the Point3 at parameter t along the ray.
    #[inline]
    pub fn point_at_time(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o=({}, {}, {}), d=({}, {}, {}), time={}]",
            self.o.x, self.o.y, self.o.z, self.d.x, self.d.y, self.d.z, self.time)
    }
}
