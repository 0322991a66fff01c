use crate::core::math::{consts::PI, lerp, Float};
use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::core::onb::Onb;
use super::{Camera, CameraSample};

/// An equirectangular camera: the film sample selects latitude and
/// longitude, covering the full sphere around `lookfrom`. The image center
/// looks toward `lookat`.
#[derive(Debug, Copy, Clone)]
pub struct EnvironmentCamera {
    pub origin: Point3f,
    pub uvw: Onb,
    pub time0: Float,
    pub time1: Float
}

impl EnvironmentCamera {
    pub fn new(
        lookfrom: Point3f,
        lookat: Point3f,
        vup: Vector3f,
        t0: Float,
        t1: Float
    ) -> EnvironmentCamera {
        let w = (lookfrom - lookat).normalize();
        let v = (-vup.cross(&w)).normalize();
        let u = w.cross(&v);
        EnvironmentCamera {
            origin: lookfrom,
            uvw: Onb::new(w, v, u),
            time0: t0,
            time1: t1
        }
    }

    pub fn get_ray(&self, s: Float, t: Float, u_time: Float) -> Ray {
        let time = lerp(u_time, self.time0, self.time1);
        let theta = PI * t;
        let phi = 2.0 * PI * s;
        let dir = Vector3f::new(
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos()
        );
        Ray::with_time(self.origin, self.uvw.local_to_world(&dir), time)
    }
}

impl Camera for EnvironmentCamera {
    fn shutter_open(&self) -> Float {
        self.time0
    }

    fn shutter_close(&self) -> Float {
        self.time1
    }

    fn generate_ray(&self, sample: &CameraSample) -> (Float, Ray) {
        (1.0, self.get_ray(sample.p_film.x, sample.p_film.y, sample.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> EnvironmentCamera {
        EnvironmentCamera::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            0.0,
            1.0
        )
    }

    #[test]
    fn image_center_looks_at_the_target() {
        let cam = camera();
        let r = cam.get_ray(0.5, 0.5, 0.0);
        assert!((r.d - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn seam_looks_away_from_the_target() {
        let cam = camera();
        let r = cam.get_ray(0.0, 0.5, 0.0);
        assert!((r.d - Vector3f::new(0.0, 0.0, 1.0)).length() < 1e-6);
        let r = cam.get_ray(1.0, 0.5, 0.0);
        assert!((r.d - Vector3f::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn quarter_turns_sweep_the_equator() {
        let cam = camera();
        let left = cam.get_ray(0.25, 0.5, 0.0);
        let right = cam.get_ray(0.75, 0.5, 0.0);
        // Opposite directions, both horizontal.
        assert!((left.d + right.d).length() < 1e-5);
        assert!(left.d.y.abs() < 1e-6);
    }

    #[test]
    fn poles_follow_the_up_axis() {
        let cam = camera();
        let top = cam.get_ray(0.5, 0.0, 0.0);
        let bottom = cam.get_ray(0.5, 1.0, 0.0);
        assert!((top.d + bottom.d).length() < 1e-5);
        assert!(top.d.x.abs() < 1e-6 && top.d.z.abs() < 1e-6);
    }

    #[test]
    fn directions_are_unit_length() {
        let cam = camera();
        for &(s, t) in &[(0.1, 0.2), (0.4, 0.9), (0.77, 0.33)] {
            let r = cam.get_ray(s, t, 0.0);
            assert!((r.d.length() - 1.0).abs() < 1e-6);
        }
    }
}
