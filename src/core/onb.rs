//! Orthonormal bases for rotating directions between local and world frames.
use super::geometry::{coordinate_system, Vector3f};

/// A right-handed orthonormal frame.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Onb {
    axis: [Vector3f; 3]
}

impl Onb {
    /// Build a frame from three explicit, already orthonormal axes.
    pub fn new(a: Vector3f, b: Vector3f, c: Vector3f) -> Onb {
        Onb{axis: [a, b, c]}
    }

    /// Build a right-handed frame around a unit forward vector, picking the
    /// helper axis from the dominant component to avoid degeneracy.
    pub fn from_w(w: &Vector3f) -> Onb {
        let w = w.normalize();
        let (u, v) = coordinate_system(&w);
        Onb{axis: [u, v, w]}
    }

    #[inline]
    pub fn u(&self) -> Vector3f {
        self.axis[0]
    }

    #[inline]
    pub fn v(&self) -> Vector3f {
        self.axis[1]
    }

    #[inline]
    pub fn w(&self) -> Vector3f {
        self.axis[2]
    }

    /// Rotate a direction expressed in this frame out into world space.
    #[inline]
    pub fn local_to_world(&self, a: &Vector3f) -> Vector3f {
        self.axis[0] * a.x + self.axis[1] * a.y + self.axis[2] * a.z
    }

    /// Project a world-space direction onto this frame's axes.
    #[inline]
    pub fn world_to_local(&self, a: &Vector3f) -> Vector3f {
        Vector3f::new(a.dot(&self.axis[0]), a.dot(&self.axis[1]), a.dot(&self.axis[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_w_is_right_handed() {
        let frame = Onb::from_w(&Vector3f::new(0.2, -0.7, 0.4));
        let cross = frame.u().cross(&frame.v());
        assert!((cross - frame.w()).length() < 1e-6);
    }

    #[test]
    fn local_world_round_trip() {
        let frame = Onb::from_w(&Vector3f::new(1.0, 2.0, 3.0));
        let d = Vector3f::new(0.3, -0.5, 0.8);
        let back = frame.world_to_local(&frame.local_to_world(&d));
        assert!((back - d).length() < 1e-6);
    }
}
