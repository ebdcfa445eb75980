//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by a maximum depth
//! - Anti-aliasing via multi-sampling
//! - A white-to-blue sky gradient where rays escape the scene

use crate::output::PixelSink;
use crate::{Camera, Color, Hittable, Ray};
use lumen_math::{unit_vector, Interval};
use rand::RngCore;

/// Hits closer than this are ignored so that a scattered ray does not
/// re-hit the surface it just left.
pub const MIN_HIT_DISTANCE: f64 = 0.001;

/// Sky color straight down.
pub const SKY_BOTTOM: Color = Color::new(1.0, 1.0, 1.0);

/// Sky color straight up.
pub const SKY_TOP: Color = Color::new(0.5, 0.7, 1.0);

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces until the ray is absorbed, escapes to
/// the sky, or `depth` runs out.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(MIN_HIT_DISTANCE, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => result.attenuation * ray_color(&result.scattered, world, depth - 1, rng),
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * SKY_BOTTOM + a * SKY_TOP
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    camera.samples_scale() * pixel_color
}

/// Linear pixel colors for a whole image, row-major from the top left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Feed every pixel to a sink in row-major order.
    pub fn write_to<S: PixelSink + ?Sized>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.begin(self.width, self.height)?;
        for color in &self.pixels {
            sink.write_pixel(*color)?;
        }
        sink.finish()
    }
}

/// Render the entire scene to an image buffer on the calling thread.
pub fn render(camera: &mut Camera, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
    camera.initialize();
    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    let mut x = 0;
    let mut y = 0;
    trace_scanlines(camera, world, rng, |color| {
        image.set(x, y, color);
        x += 1;
        if x == image.width {
            x = 0;
            y += 1;
        }
        Ok::<(), std::convert::Infallible>(())
    })
    .unwrap_or_else(|never| match never {});
    image
}

/// Render the scene on the calling thread, streaming each pixel to `sink`
/// as soon as it is finished.
pub fn render_to_sink<S: PixelSink + ?Sized>(
    camera: &mut Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    sink: &mut S,
) -> Result<(), S::Error> {
    camera.initialize();
    sink.begin(camera.image_width(), camera.image_height())?;
    trace_scanlines(camera, world, rng, |color| sink.write_pixel(color))?;
    sink.finish()
}

/// Visit every pixel in row-major order, logging scanline progress.
fn trace_scanlines<E>(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    mut emit: impl FnMut(Color) -> Result<(), E>,
) -> Result<(), E> {
    let width = camera.image_width();
    let height = camera.image_height();
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth()
    );

    let report_every = (height / 10).max(1);
    for y in 0..height {
        let remaining = height - y;
        if remaining % report_every == 0 {
            log::info!("Scanlines remaining: {}", remaining);
        } else {
            log::debug!("Scanlines remaining: {}", remaining);
        }
        for x in 0..width {
            emit(render_pixel(camera, world, x, y, rng))?;
        }
    }

    log::info!("Done.");
    Ok(())
}
