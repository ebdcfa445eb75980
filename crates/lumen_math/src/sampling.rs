//! Random sampling routines.
//!
//! Every generator takes the random source explicitly so that callers own
//! seeding and each worker can carry its own stream.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Squared lengths at or below this are rejected before normalizing, since
/// dividing by their root underflows to infinity.
const MIN_SAMPLE_LENGTH_SQUARED: f64 = 1e-160;

/// A uniform double in [0, 1).
#[inline]
pub fn random_double(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// A uniform double in [min, max).
#[inline]
pub fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * random_double(rng)
}

/// A vector with every component uniform in [min, max).
pub fn random_vec(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

/// Sample a random point in the unit square [-0.5, 0.5) x [-0.5, 0.5).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(random_double(rng) - 0.5, random_double(rng) - 0.5, 0.0)
}

/// Sample a random point inside the unit disk in the xy plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random unit vector, uniformly distributed on the unit sphere.
///
/// Rejection samples the cube [-1, 1)^3 down to the unit ball, then
/// projects onto the surface.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if MIN_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}
