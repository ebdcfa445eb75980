//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a flat list of spheres with diffuse,
//! metallic and glass materials.

mod bucket;
mod camera;
mod hittable;
mod material;
mod output;
mod renderer;
mod sphere;
mod world;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{
    color_to_rgb, linear_to_gamma, ImageFormat, OutputError, OutputResult, PixelSink, PpmSink,
};
pub use renderer::{
    ray_color, render, render_pixel, render_to_sink, sky_gradient, ImageBuffer, MIN_HIT_DISTANCE,
    SKY_BOTTOM, SKY_TOP,
};
pub use sphere::Sphere;
pub use world::World;

/// Re-export math types from lumen_math
pub use lumen_math::{Color, Interval, Point3, Ray, Vec3};
