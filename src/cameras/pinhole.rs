use crate::core::math::{lerp, radians, Float};
use crate::core::geometry::{Point2f, Point3f, Ray, Vector3f};
use crate::core::sampling::concentric_sample_disk;
use super::{Camera, CameraSample};

/// A perspective camera with a thin-lens depth of field model.
///
/// With a zero aperture every ray leaves `origin` exactly; a positive
/// aperture jitters the origin across the lens disk and pivots directions
/// about the focus plane at `focus_dist`.
#[derive(Debug, Copy, Clone)]
pub struct PinholeCamera {
    pub origin: Point3f,
    pub lower_left_corner: Point3f,
    pub horizontal: Vector3f,
    pub vertical: Vector3f,
    pub u: Vector3f,
    pub v: Vector3f,
    pub w: Vector3f,
    pub time0: Float,
    pub time1: Float,
    pub lens_radius: Float
}

impl PinholeCamera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lookfrom: Point3f,
        lookat: Point3f,
        vup: Vector3f,
        vfov: Float,
        aspect: Float,
        aperture: Float,
        focus_dist: Float,
        t0: Float,
        t1: Float
    ) -> PinholeCamera {
        let lens_radius = aperture / 2.0;
        let theta = radians(vfov);
        let half_height = (theta / 2.0).tan();
        let half_width = aspect * half_height;
        let origin = lookfrom;
        let w = (lookfrom - lookat).normalize();
        let u = vup.cross(&w).normalize();
        let v = w.cross(&u);
        let lower_left_corner = origin
            - u * (half_width * focus_dist)
            - v * (half_height * focus_dist)
            - w * focus_dist;
        PinholeCamera {
            origin,
            lower_left_corner,
            horizontal: u * (2.0 * half_width * focus_dist),
            vertical: v * (2.0 * half_height * focus_dist),
            u,
            v,
            w,
            time0: t0,
            time1: t1,
            lens_radius
        }
    }

    /// Generate the ray for film position `(s, t)`. `u_disk` must be a
    /// uniform sample of the unit disk; `u_time` selects the shutter time.
    pub fn get_ray(&self, s: Float, t: Float, u_disk: Point2f, u_time: Float) -> Ray {
        let rd = u_disk * self.lens_radius;
        let offset = self.u * rd.x + self.v * rd.y;
        let time = lerp(u_time, self.time0, self.time1);
        Ray::with_time(
            self.origin + offset,
            self.lower_left_corner + self.horizontal * s + self.vertical * t - self.origin - offset,
            time
        )
    }
}

impl Camera for PinholeCamera {
    fn shutter_open(&self) -> Float {
        self.time0
    }

    fn shutter_close(&self) -> Float {
        self.time1
    }

    fn generate_ray(&self, sample: &CameraSample) -> (Float, Ray) {
        let u_disk = concentric_sample_disk(&sample.p_lens);
        (1.0, self.get_ray(sample.p_film.x, sample.p_film.y, u_disk, sample.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_camera(aperture: Float) -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            aperture,
            1.0,
            0.0,
            1.0
        )
    }

    #[test]
    fn center_sample_looks_down_the_view_axis() {
        let cam = square_camera(0.0);
        let r = cam.get_ray(0.5, 0.5, Point2f::default(), 0.0);
        assert_eq!(r.o, Point3f::new(0.0, 0.0, 0.0));
        let d = r.d.normalize();
        assert!((d - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn corners_span_the_field_of_view() {
        // 90 degree vfov at focus 1: the film square is [-1,1]^2 at z=-1.
        let cam = square_camera(0.0);
        let r = cam.get_ray(0.0, 0.0, Point2f::default(), 0.0);
        let hit = r.point_at_time(1.0);
        assert!((hit - Point3f::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        let r = cam.get_ray(1.0, 1.0, Point2f::default(), 0.0);
        let hit = r.point_at_time(1.0);
        assert!((hit - Point3f::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn aperture_shifts_origin_but_keeps_focus_point() {
        let cam = square_camera(0.5);
        let focus_target = cam.get_ray(0.3, 0.7, Point2f::default(), 0.0).point_at_time(1.0);
        let r = cam.get_ray(0.3, 0.7, Point2f::new(1.0, 0.0), 0.0);
        assert!((r.o - Point3f::new(0.0, 0.0, 0.0)).length() > 0.2);
        // All lens samples converge on the same point of the focus plane.
        let t_plane = (focus_target.z - r.o.z) / r.d.z;
        let hit = r.point_at_time(t_plane);
        assert!((hit - focus_target).length() < 1e-5);
    }

    #[test]
    fn shutter_time_interpolates() {
        let cam = PinholeCamera::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            60.0,
            2.0,
            0.0,
            1.0,
            2.0,
            4.0
        );
        assert_eq!(cam.get_ray(0.5, 0.5, Point2f::default(), 0.0).time, 2.0);
        assert_eq!(cam.get_ray(0.5, 0.5, Point2f::default(), 0.5).time, 3.0);
        assert_eq!(cam.get_ray(0.5, 0.5, Point2f::default(), 1.0).time, 4.0);
    }

    #[test]
    fn camera_sample_adapter_matches_get_ray() {
        let cam = square_camera(0.0);
        let sample = CameraSample{
            p_film: Point2f::new(0.25, 0.75),
            p_lens: Point2f::new(0.5, 0.5),
            time: 0.0
        };
        let (weight, r) = cam.generate_ray(&sample);
        assert_eq!(weight, 1.0);
        let direct = cam.get_ray(0.25, 0.75, Point2f::default(), 0.0);
        assert_eq!(r, direct);
    }
}
