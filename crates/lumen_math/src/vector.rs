//! Vector helpers that glam does not provide with the semantics we need.

use glam::DVec3;

/// Per-axis threshold below which a vector counts as zero.
pub const NEAR_ZERO_EPSILON: f64 = 1e-8;

/// Returns true if every component is within [`NEAR_ZERO_EPSILON`] of zero.
#[inline]
pub fn near_zero(v: DVec3) -> bool {
    v.x.abs() < NEAR_ZERO_EPSILON && v.y.abs() < NEAR_ZERO_EPSILON && v.z.abs() < NEAR_ZERO_EPSILON
}

/// Scale `v` to unit length.
#[inline]
pub fn unit_vector(v: DVec3) -> DVec3 {
    v / v.length()
}

/// Mirror `v` about the surface normal `n`: `v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Bend the unit vector `uv` through a surface with normal `n` (Snell's law).
///
/// `etai_over_etat` is the ratio of refractive indices across the boundary.
/// The `abs` keeps grazing rays from taking the root of a tiny negative
/// number left over from rounding.
#[inline]
pub fn refract(uv: DVec3, n: DVec3, etai_over_etat: f64) -> DVec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
