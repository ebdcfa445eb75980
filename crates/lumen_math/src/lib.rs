//! Math primitives for the lumen path tracer.
//!
//! Vectors are double precision `glam::DVec3`. Points, directions and
//! colors share the one type and are told apart only by the aliases below.

// Re-export glam for convenience
pub use glam::DVec3;

mod interval;
mod ray;
pub mod sampling;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{near_zero, reflect, refract, unit_vector, NEAR_ZERO_EPSILON};

/// A 3D vector of doubles.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB color. Channels are nominally in [0, 1] but not bounded.
pub type Color = DVec3;
