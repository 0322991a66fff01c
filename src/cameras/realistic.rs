use anyhow::{bail, ensure, Result};
use rayon::prelude::*;
use crate::core::math::{lerp, Float};
use crate::core::geometry::{Bounds2f, Normal3f, Point2f, Point3f, Ray, Vector3f};
use crate::core::animated_transform::AnimatedTransform;
use crate::core::transform::Transform;
use crate::core::optics::refract;
use crate::core::low_discrepancy::radical_inverse;
use crate::core::math::quadratic;
use crate::core::stats::StatsAccumulator;
use super::{Camera, CameraSample};

lazy_static! {
    // The mirror is its own inverse, so it serves both directions of the
    // camera-space <-> lens-space change of handedness.
    static ref CAMERA_TO_LENS: Transform = Transform::scale(1.0, 1.0, -1.0);
}

const N_EXIT_PUPIL_BOUNDS: usize = 64;
const N_PUPIL_SAMPLES: usize = 1024 * 1024;

/// One spherical interface of the lens prescription.
///
/// `curvature_radius == 0` marks the aperture stop. `eta` is the index of
/// refraction of the medium on the film side of the interface; `0` is only
/// meaningful on the stop and means "same medium on both sides".
/// `thickness` is the z spacing to the next interface toward the film, and
/// `aperture_radius` the half-diameter of the clear opening. All lengths
/// are in world units.
#[derive(Debug, Default, Clone, Copy)]
pub struct LensElementInterface {
    pub curvature_radius: Float,
    pub thickness: Float,
    pub eta: Float,
    pub aperture_radius: Float
}

/// A camera that traces film rays through a tabulated multi-element
/// spherical lens system.
///
/// Elements are stored scene-to-film: index 0 faces the world and the last
/// element sits closest to the film, its thickness being the focused
/// film-to-rear distance. Construction focuses the system for the
/// requested object distance and precomputes per-radius exit pupil bounds;
/// afterwards the camera is immutable and `generate_ray` is safe to call
/// from many threads.
#[derive(Debug, Clone)]
pub struct RealisticCamera {
    pub camera_to_world: AnimatedTransform,
    pub shutter_open: Float,
    pub shutter_close: Float,
    simple_weighting: bool,
    cam_width: Float,
    cam_height: Float,
    diag: Float,
    min_aperture: Float,
    init: bool,
    element_interfaces: Vec<LensElementInterface>,
    exit_pupil_bounds: Vec<Bounds2f>
}

impl RealisticCamera {
    /// Build a camera from a lens prescription.
    ///
    /// `lens_data` is a flat array of `[curvature_radius_mm, thickness_mm,
    /// eta, aperture_diameter_mm]` records in scene-to-film order. Linear
    /// quantities are converted to world units by `0.001 * camera_scale`;
    /// `film_size` is the film diagonal in millimetres. An empty
    /// prescription produces an uninitialized camera on which
    /// `generate_ray` must not be called.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        camera_to_world: AnimatedTransform,
        shutter_open: Float,
        shutter_close: Float,
        aperture_diameter: Float,
        cam_width: Float,
        cam_height: Float,
        focus_distance: Float,
        simple_weighting: bool,
        lens_data: &[Float],
        film_size: Float,
        camera_scale: Float
    ) -> Result<RealisticCamera> {
        let init = !lens_data.is_empty();
        if init {
            ensure!(lens_data.len() % 4 == 0,
                "lens prescription length {} is not a multiple of 4", lens_data.len());
        }

        let mut element_interfaces = Vec::with_capacity(lens_data.len() / 4);
        for record in lens_data.chunks_exact(4) {
            let mut diameter = record[3];
            if record[0] == 0.0 {
                if aperture_diameter > diameter {
                    warn!("Specified aperture diameter {} is greater than maximum possible {}. Clamping it.",
                        aperture_diameter, diameter);
                } else {
                    diameter = aperture_diameter;
                }
            }
            let element = LensElementInterface {
                curvature_radius: record[0] * 0.001 * camera_scale,
                thickness: record[1] * 0.001 * camera_scale,
                eta: record[2],
                aperture_radius: diameter * 0.001 / 2.0 * camera_scale
            };
            ensure!(element.aperture_radius > 0.0,
                "lens interface has a non-positive aperture diameter {}", diameter);
            ensure!(element.curvature_radius == 0.0 || element.eta != 0.0,
                "refractive lens interface has a zero index of refraction");
            element_interfaces.push(element);
        }

        let min_aperture = element_interfaces.iter()
            .fold(Float::INFINITY, |acc, e| acc.min(e.aperture_radius));

        let mut camera = RealisticCamera {
            camera_to_world,
            shutter_open,
            shutter_close,
            simple_weighting,
            cam_width,
            cam_height,
            diag: film_size * 0.001 * camera_scale,
            min_aperture,
            init,
            element_interfaces,
            exit_pupil_bounds: Vec::new()
        };
        if !init {
            warn!("No lens description supplied; camera left uninitialized.");
            return Ok(camera);
        }

        // Compute lens-film distance for the requested focus distance
        let focused_thickness = camera.focus_thick_lens(focus_distance)?;
        camera.element_interfaces.last_mut().unwrap().thickness = focused_thickness;
        info!("Thick lens focus: film distance {} for focus distance {}",
            focused_thickness, focus_distance);

        // Compute exit pupil bounds at sampled points on the film
        let bounds: Vec<Bounds2f> = (0..N_EXIT_PUPIL_BOUNDS).into_par_iter().map(|i| {
            let r0 = i as Float / N_EXIT_PUPIL_BOUNDS as Float * camera.diag / 2.0;
            let r1 = (i + 1) as Float / N_EXIT_PUPIL_BOUNDS as Float * camera.diag / 2.0;
            camera.bound_exit_pupil(r0, r1)
        }).collect();
        camera.exit_pupil_bounds = bounds;

        Ok(camera)
    }

    /// Distance from the film plane to the rear lens interface.
    pub fn lens_rear_z(&self) -> Float {
        self.element_interfaces.last().unwrap().thickness
    }

    /// Distance from the film plane to the front lens interface.
    pub fn lens_front_z(&self) -> Float {
        self.element_interfaces.iter().fold(0.0, |acc, e| acc + e.thickness)
    }

    fn rear_element_radius(&self) -> Float {
        self.element_interfaces.last().unwrap().aperture_radius
    }

    /// Trace a camera-space ray starting on the film side through every
    /// lens interface. Returns the emergent camera-space ray, or `None`
    /// when the ray misses an element, is clipped by an aperture, or
    /// undergoes total internal reflection.
    pub fn trace_lenses_from_film(&self, r_camera: &Ray) -> Option<Ray> {
        let mut element_z: Float = 0.0;
        // Transform the ray from camera to lens system space
        let mut r_lens = CAMERA_TO_LENS.transform_ray(r_camera);
        for i in (0..self.element_interfaces.len()).rev() {
            let element = self.element_interfaces[i];
            element_z -= element.thickness;

            // Compute intersection of ray with lens element
            let is_stop = element.curvature_radius == 0.0;
            let (t, n) = if is_stop {
                // A ray refracted at the previous interface can end up
                // travelling back toward the film in extreme cases.
                if r_lens.d.z >= 0.0 {
                    return None;
                }
                ((element_z - r_lens.o.z) / r_lens.d.z, Normal3f::default())
            } else {
                let radius = element.curvature_radius;
                let z_center = element_z + element.curvature_radius;
                RealisticCamera::intersect_spherical_element(radius, z_center, &r_lens)?
            };

            // Test intersection point against element aperture
            let p_hit = r_lens.point_at_time(t);
            let r2 = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
            if r2 > element.aperture_radius * element.aperture_radius {
                return None;
            }
            r_lens.o = p_hit;

            // Update ray path for element interface interaction
            if !is_stop {
                let eta_i = element.eta;
                let eta_t = if i > 0 && self.element_interfaces[i - 1].eta != 0.0 {
                    self.element_interfaces[i - 1].eta
                } else {
                    1.0
                };
                let wi = -r_lens.d.normalize();
                r_lens.d = refract(&wi, &n, eta_t / eta_i)?;
            }
        }
        // Transform the ray back from lens system space to camera space
        Some(CAMERA_TO_LENS.transform_ray(&r_lens))
    }

    /// The mirror image of [`trace_lenses_from_film`]: trace a camera-space
    /// ray arriving from the scene front-to-rear down to the film side.
    ///
    /// [`trace_lenses_from_film`]: RealisticCamera::trace_lenses_from_film
    pub fn trace_lenses_from_scene(&self, r_camera: &Ray) -> Option<Ray> {
        let mut element_z = -self.lens_front_z();
        // Transform the ray from camera to lens system space
        let mut r_lens = CAMERA_TO_LENS.transform_ray(r_camera);
        for i in 0..self.element_interfaces.len() {
            let element = self.element_interfaces[i];

            // Compute intersection of ray with lens element
            let is_stop = element.curvature_radius == 0.0;
            let (t, n) = if is_stop {
                ((element_z - r_lens.o.z) / r_lens.d.z, Normal3f::default())
            } else {
                let radius = element.curvature_radius;
                let z_center = element_z + element.curvature_radius;
                RealisticCamera::intersect_spherical_element(radius, z_center, &r_lens)?
            };

            // Test intersection point against element aperture
            let p_hit = r_lens.point_at_time(t);
            let r2 = p_hit.x * p_hit.x + p_hit.y * p_hit.y;
            if r2 > element.aperture_radius * element.aperture_radius {
                return None;
            }
            r_lens.o = p_hit;

            // Update ray path for from-scene element interface interaction
            if !is_stop {
                let eta_i = if i == 0 || self.element_interfaces[i - 1].eta == 0.0 {
                    1.0
                } else {
                    self.element_interfaces[i - 1].eta
                };
                let eta_t = if element.eta != 0.0 { element.eta } else { 1.0 };
                let wi = -r_lens.d.normalize();
                r_lens.d = refract(&wi, &n, eta_t / eta_i)?;
            }
            element_z += element.thickness;
        }
        // Transform the ray back from lens system space to camera space
        Some(CAMERA_TO_LENS.transform_ray(&r_lens))
    }

    /// Intersect a ray with the spherical cap of radius `radius` whose apex
    /// sits on the optical axis with its center at `z_center`. Picks the
    /// quadratic root on the optically meaningful side of the sphere and
    /// returns it with the surface normal faced against the ray.
    fn intersect_spherical_element(
        radius: Float,
        z_center: Float,
        ray: &Ray
    ) -> Option<(Float, Normal3f)> {
        // Compute t0 and t1 for ray-element intersection
        let o = ray.o - Vector3f::new(0.0, 0.0, z_center);
        let a = ray.d.x * ray.d.x + ray.d.y * ray.d.y + ray.d.z * ray.d.z;
        let b = 2.0 * (ray.d.x * o.x + ray.d.y * o.y + ray.d.z * o.z);
        let c = o.x * o.x + o.y * o.y + o.z * o.z - radius * radius;
        let (t0, t1) = quadratic(a, b, c)?;

        // Select intersection t based on ray direction and element curvature
        let use_closer = (ray.d.z > 0.0) ^ (radius < 0.0);
        let t = if use_closer { t0.min(t1) } else { t0.max(t1) };
        if t < 0.0 {
            return None;
        }

        let ip = Point3f::from(Vector3f::from(o) + ray.d * t);
        let n = Normal3f::new(ip.x, ip.y, ip.z)
            .normalize()
            .face_forward(&-ray.d);
        Some((t, n))
    }

    fn compute_cardinal_points(r_in: &Ray, r_out: &Ray) -> (Float, Float) {
        let tf = -r_out.o.x / r_out.d.x;
        let fz = -r_out.point_at_time(tf).z;
        let tp = (r_in.o.x - r_out.o.x) / r_out.d.x;
        let pz = -r_out.point_at_time(tp).z;
        (pz, fz)
    }

    /// Locate both pairs of cardinal points by tracing paraxial rays
    /// parallel to the optical axis from either side of the system.
    fn compute_thick_lens_approximation(&self) -> Result<([Float; 2], [Float; 2])> {
        let mut pz = [0.0 as Float; 2];
        let mut fz = [0.0 as Float; 2];

        // Height from the optical axis for the parallel probe rays
        let x = self.min_aperture / 10.0;

        // Compute cardinal points for film side of lens system
        let r_scene = Ray::new(Point3f::new(x, 0.0, self.lens_front_z() + 1.0),
            Vector3f::new(0.0, 0.0, -1.0));
        let r_film = match self.trace_lenses_from_scene(&r_scene) {
            Some(r) => r,
            None => bail!("Unable to trace ray from scene to film for thick lens approximation. Is aperture stop extremely small?")
        };
        let cardinal = RealisticCamera::compute_cardinal_points(&r_scene, &r_film);
        pz[0] = cardinal.0;
        fz[0] = cardinal.1;

        // Compute cardinal points for scene side of lens system
        let r_film = Ray::new(Point3f::new(x, 0.0, self.lens_rear_z() - 1.0),
            Vector3f::new(0.0, 0.0, 1.0));
        let r_scene = match self.trace_lenses_from_film(&r_film) {
            Some(r) => r,
            None => bail!("Unable to trace ray from film to scene for thick lens approximation. Is aperture stop extremely small?")
        };
        let cardinal = RealisticCamera::compute_cardinal_points(&r_film, &r_scene);
        pz[1] = cardinal.0;
        fz[1] = cardinal.1;
        Ok((pz, fz))
    }

    /// Solve in closed form for the rear element thickness that focuses an
    /// object plane at `focus_distance` onto the film.
    fn focus_thick_lens(&self, focus_distance: Float) -> Result<Float> {
        let (pz, fz) = self.compute_thick_lens_approximation()?;
        info!("Cardinal points: p' = {} f' = {}, p = {} f = {}", pz[0], fz[0], pz[1], fz[1]);
        info!("Effective focal length {}", fz[0] - pz[0]);

        // Compute translation of lens, delta, to focus at focus_distance
        let f = fz[0] - pz[0];
        let z = -focus_distance;
        let c = (pz[1] - z - pz[0]) * (pz[1] - z - 4.0 * f - pz[0]);
        if c < 0.0 {
            bail!("Focus distance {} is too short for the given lens configuration", focus_distance);
        }
        let delta = 0.5 * (pz[1] - z + pz[0] - c.sqrt());
        Ok(self.element_interfaces.last().unwrap().thickness + delta)
    }

    /// Refine the focus by bisecting on the measured focus distance.
    /// The closed-form thick-lens solve is what construction uses; this
    /// search is a diagnostic for prescriptions where the thick-lens
    /// approximation drifts.
    pub fn focus_binary_search(&self, focus_distance: Float) -> Result<Float> {
        // Find film distances that bracket the focus distance
        let mut film_distance_lower = self.focus_thick_lens(focus_distance)?;
        let mut film_distance_upper = film_distance_lower;
        while self.focus_distance(film_distance_lower) > focus_distance {
            film_distance_lower *= 1.005;
        }
        while self.focus_distance(film_distance_upper) < focus_distance {
            film_distance_upper /= 1.005;
        }

        // Do binary search on film distances to focus
        for _ in 0..20 {
            let fmid = 0.5 * (film_distance_lower + film_distance_upper);
            let mid_focus = self.focus_distance(fmid);
            if mid_focus < focus_distance {
                film_distance_lower = fmid;
            } else {
                film_distance_upper = fmid;
            }
        }
        Ok(0.5 * (film_distance_lower + film_distance_upper))
    }

    /// Measure the object distance the system focuses at when the film
    /// sits `film_distance` behind the rear element, by tracing an
    /// off-axis ray and solving for its crossing of the optical axis.
    /// Returns infinity when the focus lands behind the lens or no probe
    /// ray makes it through.
    pub fn focus_distance(&self, film_distance: Float) -> Float {
        // Find offset ray from film center through lens
        let bounds = self.bound_exit_pupil(0.0, self.min_aperture / 10.0);

        // Try decreasing scale factors until a probe ray makes it through
        // the lens system; very small stops reject the larger offsets.
        let scale_factors: [Float; 3] = [0.1, 0.01, 0.001];
        let mut lu: Float = 0.0;
        let mut found: Option<Ray> = None;
        for scale in scale_factors.iter() {
            lu = scale * bounds.max.x;
            let probe = Ray::new(Point3f::new(0.0, 0.0, self.lens_rear_z() - film_distance),
                Vector3f::new(lu, 0.0, film_distance));
            if let Some(r) = self.trace_lenses_from_film(&probe) {
                found = Some(r);
                break;
            }
        }
        let ray = match found {
            Some(r) => r,
            None => {
                error!("Focus ray at lens pos({}, 0) didn't make it through the lenses with film distance {}",
                    lu, film_distance);
                return Float::INFINITY;
            }
        };

        // Compute distance zFocus where ray intersects the principal axis
        let t_focus = -ray.o.x / ray.d.x;
        let z_focus = ray.point_at_time(t_focus).z;
        if z_focus < 0.0 {
            Float::INFINITY
        } else {
            z_focus
        }
    }

    /// Compute a conservative 2D bound on the rear-element plane of the
    /// exit pupil seen from film radii in `[p_film_x0, p_film_x1]`.
    fn bound_exit_pupil(&self, p_film_x0: Float, p_film_x1: Float) -> Bounds2f {
        let mut pupil_bounds = Bounds2f::default();
        let mut n_exiting_rays = 0_u32;

        // Compute bounding box of projection of rear element on sampling plane
        let rear_radius = self.rear_element_radius();
        let proj_rear_bounds = Bounds2f::new(
            Point2f::new(-1.5 * rear_radius, -1.5 * rear_radius),
            Point2f::new(1.5 * rear_radius, 1.5 * rear_radius)
        );
        for i in 0..N_PUPIL_SAMPLES {
            // Find location of sample points on x segment and rear lens element
            let p_film = Point3f::new(
                lerp((i as Float + 0.5) / N_PUPIL_SAMPLES as Float, p_film_x0, p_film_x1), 0.0, 0.0);
            let u = [radical_inverse(0, i as u64), radical_inverse(1, i as u64)];
            let p_rear = Point3f::new(
                lerp(u[0], proj_rear_bounds.min.x, proj_rear_bounds.max.x),
                lerp(u[1], proj_rear_bounds.min.y, proj_rear_bounds.max.y),
                self.lens_rear_z()
            );

            // Expand pupil bounds if ray makes it through the lens system.
            // Points already inside the bound are counted without tracing;
            // the inclusion test is monotone so the bound is unchanged.
            let p = Point2f::new(p_rear.x, p_rear.y);
            if pupil_bounds.inside(&p) ||
                self.trace_lenses_from_film(&Ray::new(p_film, p_rear - p_film)).is_some() {
                pupil_bounds = pupil_bounds.union_point(&p);
                n_exiting_rays += 1;
            }
        }

        // Return entire element bounds if no rays made it through the lens system
        if n_exiting_rays == 0 {
            info!("Unable to find exit pupil in x = [{}, {}] on film.", p_film_x0, p_film_x1);
            return proj_rear_bounds;
        }

        // Expand bounds to account for sample spacing
        pupil_bounds.expand(2.0 * proj_rear_bounds.diagonal().length() /
            (N_PUPIL_SAMPLES as Float).sqrt())
    }

    /// Map a unit-square lens sample into the exit pupil bound for the
    /// given film point, rotated into the film point's azimuth. Returns
    /// the rear-plane point and the area of the sampled bound.
    fn sample_exit_pupil(&self, p_film: &Point2f, lens_sample: &Point2f) -> (Point3f, Float) {
        // Find exit pupil bound for sample distance from film center
        let r_film = (p_film.x * p_film.x + p_film.y * p_film.y).sqrt();
        let mut r_index = (r_film / (self.diag / 2.0) * self.exit_pupil_bounds.len() as Float) as usize;
        r_index = r_index.min(self.exit_pupil_bounds.len() - 1);
        let pupil_bounds = self.exit_pupil_bounds[r_index];

        // Generate sample point inside exit pupil bound
        let p_lens = pupil_bounds.lerp(lens_sample);

        // Return sample point rotated by angle of p_film with the +x axis
        let sin_theta = if r_film != 0.0 { p_film.y / r_film } else { 0.0 };
        let cos_theta = if r_film != 0.0 { p_film.x / r_film } else { 1.0 };
        let p = Point3f::new(
            cos_theta * p_lens.x - sin_theta * p_lens.y,
            sin_theta * p_lens.x + cos_theta * p_lens.y,
            self.lens_rear_z()
        );
        (p, pupil_bounds.area())
    }

    /// The film rectangle in world units: an axis-aligned box of diagonal
    /// `diag` with the aspect ratio of the render target, centered on the
    /// optical axis.
    pub fn get_physical_extent(&self) -> Bounds2f {
        let aspect = self.cam_height / self.cam_width;
        let x = (self.diag * self.diag / (1.0 + aspect * aspect)).sqrt();
        let y = aspect * x;
        Bounds2f::new(Point2f::new(-x / 2.0, -y / 2.0), Point2f::new(x / 2.0, y / 2.0))
    }
}

impl Camera for RealisticCamera {
    fn shutter_open(&self) -> Float {
        self.shutter_open
    }

    fn shutter_close(&self) -> Float {
        self.shutter_close
    }

    fn generate_ray(&self, sample: &CameraSample) -> (Float, Ray) {
        assert!(self.init, "generate_ray() called on a camera without a lens description");
        // Find point on film corresponding to sample.p_film
        let p_film2 = self.get_physical_extent().lerp(&sample.p_film);
        // x flips because the lens system inverts the optical image.
        let p_film = Point3f::new(-p_film2.x, p_film2.y, 0.0);

        // Trace ray from film point through lens system
        let (p_rear, exit_pupil_bounds_area) =
            self.sample_exit_pupil(&Point2f::new(p_film.x, p_film.y), &sample.p_lens);
        let r_film = Ray::with_time(
            p_film,
            (p_rear - p_film).normalize(),
            lerp(sample.time, self.shutter_open, self.shutter_close)
        );
        // Film-side cosine, captured before the trace touches the ray.
        let cos_theta = r_film.d.z;
        let traced = match self.trace_lenses_from_film(&r_film) {
            Some(r) => r,
            None => {
                StatsAccumulator::instance()
                    .report_percentage("Camera/Rays vignetted by lens system", 1, 1);
                return (0.0, Ray::default());
            }
        };
        StatsAccumulator::instance()
            .report_percentage("Camera/Rays vignetted by lens system", 0, 1);

        // Finish initialization of the camera ray
        let mut ray = self.camera_to_world.transform_ray(&traced);
        ray.d = ray.d.normalize();

        // Return weighting for the camera ray
        let cos4_theta = (cos_theta * cos_theta) * (cos_theta * cos_theta);
        let weight = if self.simple_weighting {
            cos4_theta * exit_pupil_bounds_area / self.exit_pupil_bounds[0].area()
        } else {
            (self.shutter_close - self.shutter_open) *
                (cos4_theta * exit_pupil_bounds_area) / (self.lens_rear_z() * self.lens_rear_z())
        };
        (weight, ray)
    }
}
