//! End-to-end renders of a small fixed scene.

use std::sync::Arc;

use lumen_core::CameraSettings;
use lumen_renderer::{
    render, render_parallel, render_to_sink, sky_gradient, Camera, Color, Dielectric,
    HittableList, ImageBuffer, Lambertian, Material, Point3, PpmSink, Ray, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTH: u32 = 20;
const SAMPLES: u32 = 16;
const SEED: u64 = 2024;
const VFOV: f64 = 60.0;
const FOCUS_DIST: f64 = 3.0;

fn camera() -> Camera {
    Camera::new(CameraSettings {
        aspect_ratio: 1.0,
        image_width: WIDTH,
        samples_per_pixel: SAMPLES,
        max_depth: 10,
        vfov: VFOV,
        look_from: Point3::new(0.0, 0.5, 3.0),
        look_at: Point3::new(0.0, 0.5, 0.0),
        vup: Vec3::Y,
        defocus_angle: 0.0,
        focus_dist: FOCUS_DIST,
    })
}

/// One ground sphere, one glass sphere, and the sky.
fn scene() -> HittableList {
    let ground = Arc::new(Material::from(Lambertian::new(Color::new(0.5, 0.5, 0.5))));
    let glass = Arc::new(Material::from(Dielectric::new(1.5)));

    let mut world = HittableList::new();
    world.add(lumen_renderer::Sphere::new(
        Point3::new(0.0, -100.0, 0.0),
        99.5,
        ground,
    ));
    world.add(lumen_renderer::Sphere::new(
        Point3::new(0.0, 0.5, 0.0),
        0.5,
        glass,
    ));
    world
}

fn render_serial(seed: u64) -> ImageBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    render(&mut camera(), &scene(), &mut rng)
}

/// Direction through the center of pixel (i, j) for the camera above.
fn pixel_center_direction(i: u32, j: u32) -> Vec3 {
    let viewport_height = 2.0 * (VFOV.to_radians() / 2.0).tan() * FOCUS_DIST;
    let viewport_width = viewport_height;
    let pixel = viewport_width / WIDTH as f64;
    Vec3::new(
        -viewport_width / 2.0 + (i as f64 + 0.5) * pixel,
        viewport_height / 2.0 - (j as f64 + 0.5) * pixel,
        -FOCUS_DIST,
    )
}

/// Linear colors of `render_serial(SEED)`: a `width height` line, then one
/// `r g b` line per pixel in row-major order.
const REFERENCE: &str = include_str!("data/glass_on_ground.txt");

/// Largest per-channel difference accepted against the reference image.
const REFERENCE_TOLERANCE: f64 = 1e-4;

fn reference_image() -> ImageBuffer {
    let mut values = REFERENCE
        .split_whitespace()
        .map(|token| token.parse::<f64>().unwrap());
    let width = values.next().unwrap() as u32;
    let height = values.next().unwrap() as u32;

    let mut image = ImageBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let r = values.next().unwrap();
            let g = values.next().unwrap();
            let b = values.next().unwrap();
            image.set(x, y, Color::new(r, g, b));
        }
    }
    assert!(values.next().is_none(), "trailing values in reference");
    image
}

#[test]
fn serial_render_matches_reference_image() {
    let expected = reference_image();
    let actual = render_serial(SEED);
    assert_eq!((actual.width, actual.height), (expected.width, expected.height));

    let mut mismatched = Vec::new();
    for y in 0..expected.height {
        for x in 0..expected.width {
            let diff = (actual.get(x, y) - expected.get(x, y)).abs().max_element();
            if diff > REFERENCE_TOLERANCE {
                mismatched.push((x, y, diff));
            }
        }
    }
    assert!(
        mismatched.is_empty(),
        "{} pixels differ from the reference, first: {:?}",
        mismatched.len(),
        &mismatched[..mismatched.len().min(5)]
    );
}

#[test]
fn serial_render_is_repeatable() {
    let a = render_serial(SEED);
    let b = render_serial(SEED);
    assert_eq!((a.width, a.height), (WIDTH, WIDTH));
    assert_eq!(a, b);

    let c = render_serial(SEED + 1);
    assert_ne!(a, c);
}

#[test]
fn pixels_are_finite_and_non_negative() {
    let image = render_serial(SEED);
    for color in &image.pixels {
        assert!(color.is_finite(), "non-finite pixel {:?}", color);
        assert!(color.min_element() >= 0.0, "negative pixel {:?}", color);
    }
}

#[test]
fn top_row_matches_sky_gradient() {
    let image = render_serial(SEED);
    for i in 0..WIDTH {
        let expected = sky_gradient(&Ray::new(Point3::ZERO, pixel_center_direction(i, 0)));
        let actual = image.get(i, 0);
        let diff = (actual - expected).abs().max_element();
        assert!(
            diff < 0.02,
            "pixel ({}, 0): {:?} vs sky {:?}",
            i,
            actual,
            expected
        );
    }
}

#[test]
fn ground_is_darker_than_albedo_times_sky() {
    // Every path off the ground is attenuated by 0.5 first, and nothing
    // in the scene is brighter than 1.
    let image = render_serial(SEED);
    for i in 0..WIDTH {
        let color = image.get(i, WIDTH - 1);
        assert!(color.max_element() <= 0.5 + 1e-12, "pixel ({}, bottom) = {:?}", i, color);
        assert!(color.max_element() > 0.0);
    }
}

#[test]
fn streaming_matches_buffered_output() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut streamed = PpmSink::new(Vec::new());
    render_to_sink(&mut camera(), &scene(), &mut rng, &mut streamed).unwrap();

    let mut buffered = PpmSink::new(Vec::new());
    render_serial(SEED).write_to(&mut buffered).unwrap();

    let streamed = String::from_utf8(streamed.into_inner()).unwrap();
    let buffered = String::from_utf8(buffered.into_inner()).unwrap();
    assert!(streamed.starts_with("P3\n20 20\n255\n"));
    assert_eq!(streamed.lines().count(), 3 + (WIDTH * WIDTH) as usize);
    assert_eq!(streamed, buffered);
}

#[test]
fn parallel_render_ignores_thread_count() {
    let world = scene();
    let render_with_threads = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| render_parallel(&mut camera(), &world, SEED, 8))
    };

    let single = render_with_threads(1);
    let many = render_with_threads(4);
    assert_eq!(single, many);
}

#[test]
fn parallel_and_serial_agree_statistically() {
    // Different random streams, same estimator: the images should be close
    // on average even though individual pixels differ.
    let serial = render_serial(SEED);
    let parallel = render_parallel(&mut camera(), &scene(), SEED, 8);

    let mean = |image: &ImageBuffer| {
        image.pixels.iter().copied().sum::<Color>() / image.pixels.len() as f64
    };
    let diff = (mean(&serial) - mean(&parallel)).abs().max_element();
    assert!(diff < 0.03, "mean difference {}", diff);
}
