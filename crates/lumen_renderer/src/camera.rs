//! Camera for ray generation.

use crate::Ray;
use lumen_core::CameraSettings;
use lumen_math::{
    sampling::{random_in_unit_disk, sample_square},
    unit_vector, Point3, Vec3,
};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// Configure with [`Camera::new`] or the builder methods; both leave the
/// camera ready to generate rays. Call [`Camera::initialize`] again only
/// after changing settings some other way. The renderers do this
/// themselves at the start of every render.
#[derive(Clone, Debug)]
pub struct Camera {
    settings: CameraSettings,

    // Cached computed values (set by initialize())
    image_height: u32,
    samples_scale: f64,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a camera from settings.
    pub fn new(settings: CameraSettings) -> Self {
        let mut camera = Self {
            settings,
            image_height: 1,
            samples_scale: 1.0,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.settings.image_width = image_width;
        self.settings.aspect_ratio = aspect_ratio;
        self.initialize();
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.settings.samples_per_pixel = samples_per_pixel;
        self.settings.max_depth = max_depth;
        self.initialize();
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.settings.look_from = look_from;
        self.settings.look_at = look_at;
        self.settings.vup = vup;
        self.initialize();
        self
    }

    /// Set lens settings. Angles are in degrees.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.settings.vfov = vfov;
        self.settings.defocus_angle = defocus_angle;
        self.settings.focus_dist = focus_dist;
        self.initialize();
        self
    }

    /// Recompute the cached viewport and lens values from the settings.
    ///
    /// A zero image width or zero samples per pixel is the caller's
    /// mistake and produces a degenerate camera.
    pub fn initialize(&mut self) {
        let s = &self.settings;
        debug_assert!(s.image_width > 0, "image width must be positive");
        debug_assert!(s.samples_per_pixel > 0, "samples per pixel must be positive");

        self.image_height = s.image_height();
        self.samples_scale = 1.0 / s.samples_per_pixel as f64;
        self.center = s.look_from;

        // Calculate viewport dimensions
        let theta = s.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * s.focus_dist;
        let viewport_width = viewport_height * (s.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = unit_vector(s.look_from - s.look_at);
        self.u = unit_vector(s.vup.cross(self.w));
        self.v = self.w.cross(self.u);

        // Viewport edges: across the horizontal edge, and down the vertical edge
        let viewport_u = viewport_width * self.u;
        let viewport_v = viewport_height * -self.v;

        self.pixel_delta_u = viewport_u / s.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - s.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = s.focus_dist * (s.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray passes through a random point in the pixel's square and
    /// starts at the camera center, or on the defocus disk when the lens
    /// has a positive defocus angle.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.settings.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.settings.max_depth
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f64 {
        self.samples_scale
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::default()
            .with_resolution(800, 4.0 / 3.0)
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        assert_eq!(camera.image_height(), 600);
        assert_eq!(camera.center(), Point3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 1e-12);
        assert!((camera.u - Vec3::X).length() < 1e-12);
        assert!((camera.v - Vec3::Y).length() < 1e-12);

        // 90 degree fov at focus distance 1: viewport height 2
        assert!((camera.pixel_delta_v.length() * 600.0 - 2.0).abs() < 1e-9);
        assert!((camera.pixel_delta_u.length() * 800.0 - 2.0 * 800.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_samples_scale() {
        let mut camera = Camera::default().with_quality(16, 5);
        camera.initialize();
        assert_eq!(camera.samples_scale(), 1.0 / 16.0);
        assert_eq!(camera.max_depth(), 5);
    }

    #[test]
    fn test_center_pixel_ray_points_forward() {
        let mut camera = Camera::default()
            .with_resolution(101, 1.0)
            .with_position(Point3::new(0.0, 0.0, 5.0), Point3::ZERO, Vec3::Y)
            .with_lens(60.0, 0.0, 5.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let ray = camera.get_ray(50, 50, &mut rng);
            assert_eq!(ray.origin(), Point3::new(0.0, 0.0, 5.0));
            let dir = unit_vector(ray.direction());
            assert!(dir.z < -0.999, "dir = {:?}", dir);
        }
    }

    #[test]
    fn test_pixel_rows_run_top_to_bottom() {
        let mut camera = Camera::default().with_resolution(10, 1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(1);
        let top = camera.get_ray(5, 0, &mut rng);
        let bottom = camera.get_ray(5, 9, &mut rng);
        let left = camera.get_ray(0, 5, &mut rng);
        let right = camera.get_ray(9, 5, &mut rng);

        assert!(top.direction().y > 0.0);
        assert!(bottom.direction().y < 0.0);
        assert!(left.direction().x < 0.0);
        assert!(right.direction().x > 0.0);
    }

    #[test]
    fn test_samples_stay_inside_pixel() {
        let mut camera = Camera::default()
            .with_resolution(10, 1.0)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        // Viewport is 2x2 at z=-1 so each pixel is 0.2 wide.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let ray = camera.get_ray(0, 0, &mut rng);
            let p = ray.at(1.0);
            assert!((p.z + 1.0).abs() < 1e-12);
            assert!(p.x >= -1.0 - 1e-12 && p.x <= -0.8 + 1e-12);
            assert!(p.y <= 1.0 + 1e-12 && p.y >= 0.8 - 1e-12);
        }
    }

    #[test]
    fn test_defocus_origins_lie_on_lens_disk() {
        let focus_dist = 4.0;
        let defocus_angle = 10.0;
        let mut camera = Camera::default()
            .with_position(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(40.0, defocus_angle, focus_dist);
        camera.initialize();

        let radius = focus_dist * (defocus_angle / 2.0_f64).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(8);
        let mut moved = 0;
        for _ in 0..500 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let origin = ray.origin();
            assert!(origin.z.abs() < 1e-12);
            assert!(origin.length() < radius + 1e-12);
            if origin.length() > 1e-6 {
                moved += 1;
            }
        }
        assert!(moved > 490);
    }

    #[test]
    fn test_builders_leave_camera_ready() {
        let camera = Camera::default()
            .with_resolution(800, 4.0 / 3.0)
            .with_quality(16, 5)
            .with_position(Point3::new(0.0, 0.0, 2.0), Point3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 4.0);

        assert_eq!(camera.image_height(), 600);
        assert_eq!(camera.samples_scale(), 1.0 / 16.0);
        assert_eq!(camera.center(), Point3::new(0.0, 0.0, 2.0));

        let radius = 4.0 * 5.0_f64.to_radians().tan();
        let mut rng = StdRng::seed_from_u64(11);
        let mut moved = 0;
        for _ in 0..200 {
            let origin = camera.get_ray(400, 300, &mut rng).origin();
            let offset = origin - Point3::new(0.0, 0.0, 2.0);
            assert!(offset.z.abs() < 1e-12);
            assert!(offset.length() < radius + 1e-12);
            if offset.length() > 1e-6 {
                moved += 1;
            }
        }
        assert!(moved > 190);
    }

    #[test]
    fn test_builder_matches_camera_from_settings() {
        let built = Camera::default()
            .with_resolution(64, 2.0)
            .with_lens(30.0, 0.0, 2.0);
        let direct = Camera::new(CameraSettings {
            image_width: 64,
            aspect_ratio: 2.0,
            vfov: 30.0,
            focus_dist: 2.0,
            ..CameraSettings::default()
        });

        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        assert_eq!(built.image_height(), direct.image_height());
        assert_eq!(built.get_ray(7, 3, &mut a), direct.get_ray(7, 3, &mut b));
    }

    #[test]
    fn test_pinhole_when_defocus_angle_is_zero() {
        let camera = Camera::default().with_lens(90.0, 0.0, 10.0);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert_eq!(camera.get_ray(3, 7, &mut rng).origin(), Point3::ZERO);
        }
    }
}
