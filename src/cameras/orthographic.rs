use crate::core::math::{lerp, Float};
use crate::core::geometry::{Point3f, Ray, Vector3f};
use super::{Camera, CameraSample};

/// A parallel-projection camera. Rays start on the film rectangle and all
/// share the view direction `-w`.
#[derive(Debug, Copy, Clone)]
pub struct OrthographicCamera {
    pub origin: Point3f,
    pub lower_left_corner: Point3f,
    pub horizontal: Vector3f,
    pub vertical: Vector3f,
    pub u: Vector3f,
    pub v: Vector3f,
    pub w: Vector3f,
    pub time0: Float,
    pub time1: Float
}

impl OrthographicCamera {
    pub fn new(
        lookfrom: Point3f,
        lookat: Point3f,
        vup: Vector3f,
        cam_width: Float,
        cam_height: Float,
        t0: Float,
        t1: Float
    ) -> OrthographicCamera {
        let origin = lookfrom;
        let w = (lookfrom - lookat).normalize();
        let u = vup.cross(&w).normalize();
        let v = w.cross(&u);
        let lower_left_corner = origin - u * (cam_width / 2.0) - v * (cam_height / 2.0);
        OrthographicCamera {
            origin,
            lower_left_corner,
            horizontal: u * cam_width,
            vertical: v * cam_height,
            u,
            v,
            w,
            time0: t0,
            time1: t1
        }
    }

    pub fn get_ray(&self, s: Float, t: Float, u_time: Float) -> Ray {
        let time = lerp(u_time, self.time0, self.time1);
        Ray::with_time(
            self.lower_left_corner + self.horizontal * s + self.vertical * t,
            -self.w,
            time
        )
    }
}

impl Camera for OrthographicCamera {
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

    fn square_camera() -> OrthographicCamera {
        OrthographicCamera::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            2.0,
            2.0,
            0.0,
            1.0
        )
    }

    #[test]
    fn rays_are_parallel_to_the_view_axis() {
        let cam = square_camera();
        for &(s, t) in &[(0.0, 0.0), (0.3, 0.9), (1.0, 1.0)] {
            let r = cam.get_ray(s, t, 0.0);
            assert!((r.d - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-6);
        }
    }

    #[test]
    fn film_corner_origins() {
        let cam = square_camera();
        let r = cam.get_ray(0.0, 0.0, 0.0);
        assert!((r.o - Point3f::new(-1.0, -1.0, 0.0)).length() < 1e-6);
        let r = cam.get_ray(1.0, 1.0, 0.0);
        assert!((r.o - Point3f::new(1.0, 1.0, 0.0)).length() < 1e-6);
        let r = cam.get_ray(0.5, 0.5, 0.0);
        assert!((r.o - Point3f::new(0.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn camera_sample_adapter_has_unit_weight() {
        let cam = square_camera();
        let sample = CameraSample{
            p_film: crate::core::geometry::Point2f::new(0.5, 0.5),
            p_lens: crate::core::geometry::Point2f::new(0.1, 0.9),
            time: 0.5
        };
        let (weight, r) = cam.generate_ray(&sample);
        assert_eq!(weight, 1.0);
        assert_eq!(r.time, 0.5);
    }
}
